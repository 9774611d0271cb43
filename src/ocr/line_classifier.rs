/// Data-row detection for OCR page text
///
/// Data rows are almost entirely numeric; narrative and header text has a much
/// lower share of digits. A line must pass the density test and then start with
/// a recognized height marker.
use crate::reference::is_recognized_height;
use crate::utils::fold_decimal_digits;

/// Minimum share of numeric characters (digits, `.`, `-`, `+`, space)
pub const NUMERIC_DENSITY_THRESHOLD: f64 = 0.85;

/// Share of characters in `line` that can belong to a number row
pub fn numeric_density(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let numeric = line
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ' '))
        .count();
    numeric as f64 / total as f64
}

/// Leading run of ASCII digits parsed as an integer
fn leading_integer(line: &str) -> Option<u32> {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    line[..end].parse::<u32>().ok()
}

/// Check if a line (prefix already stripped) is a numeric data row
pub fn is_data_line(line: &str) -> bool {
    let stripped = line.trim();
    if stripped.is_empty() {
        return false;
    }

    if numeric_density(stripped) < NUMERIC_DENSITY_THRESHOLD {
        return false;
    }

    match leading_integer(&fold_decimal_digits(stripped)) {
        Some(first) => is_recognized_height(first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_data_row() {
        assert!(is_data_line("10 271.3 4.1 270.8 4.3 268.2 5.0"));
        assert!(is_data_line("  3000 -12.4 2.0 -11.8 2.2  "));
    }

    #[test]
    fn test_accepts_alias_height() {
        assert!(is_data_line("1200 265.1 3.9 264.0 4.1"));
        assert!(is_data_line("5000 255.0 3.0 254.1 3.1"));
    }

    #[test]
    fn test_rejects_unknown_leading_number() {
        assert!(!is_data_line("200 265.1 3.9 264.0 4.1"));
        assert!(!is_data_line("2010 1 2 3 4 5"));
    }

    #[test]
    fn test_rejects_leading_sign() {
        // the leading token must be a bare integer
        assert!(!is_data_line("-10 271.3 4.1 270.8 4.3"));
    }

    #[test]
    fn test_rejects_narrative_text() {
        assert!(!is_data_line("Таблица 12 - Температура воздуха T, K"));
        assert!(!is_data_line("10 m height above ground level"));
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(!is_data_line(""));
        assert!(!is_data_line("     "));
    }

    #[test]
    fn test_density_threshold_boundary() {
        // 17 numeric of 20 characters = 0.85 exactly, which passes
        let line = "10 1 2 3 4 5 6 7 abc";
        assert_eq!(line.chars().count(), 20);
        assert!((numeric_density(line) - 0.85).abs() < 1e-9);
        assert!(is_data_line(line));

        // one more letter pushes it under
        assert!(!is_data_line("10 1 2 3 4 5 6 7 abcd"));
    }

    #[test]
    fn test_comma_decimals_lower_density() {
        // commas are not numeric characters for the density test
        assert!(is_data_line("10 271.3 4,1 270.8 4.3 268.2 5.0"));
        // short rows full of comma decimals fall under the threshold
        assert!(!is_data_line("10 4,8 1,2 4,9 1,3"));
    }

    #[test]
    fn test_full_width_height_marker() {
        assert!(is_data_line("１０ 271.3 4.1 270.8 4.3 268.2 5.0 269.1 4.4 270.0"));
        assert!(!is_data_line("２００ 271.3 4.1 270.8 4.3 268.2 5.0 269.1 4.4 270.0"));
    }

    #[test]
    fn test_leading_integer_overflow() {
        assert!(!is_data_line("99999999999999999999 1 2"));
    }
}
