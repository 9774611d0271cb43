/// Shared text helpers for the page dumps
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static LINE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+→").expect("line prefix regex is valid"));

static DECIMAL_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("decimal digit regex is valid"));

fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT_RE.is_match(c.encode_utf8(&mut [0; 4]))
}

/// ASCII form of a Unicode decimal digit (`４` -> `4`)
///
/// Decimal digits are encoded in contiguous runs of ten starting at zero, so
/// the value is the run offset modulo ten.
fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut offset = 0;
    let mut code = c as u32;
    while let Some(prev) = code
        .checked_sub(1)
        .and_then(char::from_u32)
        .filter(|p| is_decimal_digit(*p))
    {
        offset += 1;
        code = prev as u32;
    }
    char::from_digit(offset % 10, 10)
}

/// Replace non-ASCII decimal digits (full-width, Arabic-Indic, ...) with ASCII ones
///
/// # Examples
///
/// ```
/// use gost_boundary_layer::utils::fold_decimal_digits;
///
/// assert_eq!(fold_decimal_digits("10 ４.3"), "10 4.3");
/// ```
pub fn fold_decimal_digits(line: &str) -> Cow<'_, str> {
    if line.is_ascii() {
        return Cow::Borrowed(line);
    }
    Cow::Owned(line.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect())
}

/// Lines of a page dump, splitting on `\n`, `\r\n` and lone `\r`
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Remove the line-number marker that prefixes lines in numbered text dumps
///
/// Page dumps produced by a line-numbering viewer look like `    12→10 271.3 4.1 ...`.
/// The marker is stripped before classification; unprefixed lines pass through.
///
/// # Examples
///
/// ```
/// use gost_boundary_layer::utils::strip_line_prefix;
///
/// assert_eq!(strip_line_prefix("    12→10 271.3 4.1"), "10 271.3 4.1");
/// assert_eq!(strip_line_prefix("10 271.3 4.1"), "10 271.3 4.1");
/// ```
pub fn strip_line_prefix(line: &str) -> &str {
    match LINE_PREFIX_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// File name of a page dump: `page_NNN.txt`, zero-padded to three digits
///
/// # Examples
///
/// ```
/// use gost_boundary_layer::utils::page_file_name;
///
/// assert_eq!(page_file_name(9), "page_009.txt");
/// assert_eq!(page_file_name(116), "page_116.txt");
/// ```
pub fn page_file_name(page_num: u32) -> String {
    format!("page_{page_num:03}.txt")
}
