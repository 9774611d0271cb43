/// Row extraction and decimal-recovery repair
///
/// A data line such as `100 261.7 4,1 263 2 3.9` becomes a height marker plus
/// the ordered numeric values that follow it. Once the page geometry is known,
/// [`DataRow::fit_to`] reconciles the values with the expected column count.
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::reference::canonical_height;
use crate::utils::fold_decimal_digits;

static DECIMAL_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d),(\d)").expect("decimal comma regex is valid"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("number regex is valid"));

/// Minimum numeric tokens on a row: the height plus one value pair
pub const MIN_ROW_TOKENS: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum RowExtractError {
    #[error("Too few numbers on row: found {0}, need at least 3")]
    TooFewNumbers(usize),

    #[error("Invalid height marker: {0}")]
    InvalidHeight(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// One extracted data row: canonical height and the raw values after it
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub height: u32,
    pub values: Vec<f64>,
}

/// Row values reconciled to the page's expected count
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRow {
    pub values: Vec<Option<f64>>,
    /// Split decimals merged back together
    pub merges: usize,
    /// Excess values cut from the end
    pub truncated: usize,
    /// Absent slots appended at the end
    pub padded: usize,
}

/// Replace `digit,digit` with `digit.digit` (comma decimal separators from OCR)
pub fn normalize_decimal_commas(line: &str) -> String {
    DECIMAL_COMMA_RE.replace_all(line, "$1.$2").into_owned()
}

/// Extract the height and data values from a data line
pub fn extract_row(line: &str) -> Result<DataRow, RowExtractError> {
    let normalized = normalize_decimal_commas(&fold_decimal_digits(line.trim()));

    let numbers: Vec<&str> = NUMBER_RE
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .collect();

    if numbers.len() < MIN_ROW_TOKENS {
        return Err(RowExtractError::TooFewNumbers(numbers.len()));
    }

    let height_token = numbers[0];
    let height = height_token
        .parse::<f64>()
        .ok()
        .map(|h| h.trunc())
        .filter(|h| (0.0..=u32::MAX as f64).contains(h))
        .map(|h| h as u32)
        .ok_or_else(|| RowExtractError::InvalidHeight(height_token.to_string()))?;

    let values = numbers[1..]
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| RowExtractError::InvalidNumber(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DataRow {
        height: canonical_height(height),
        values,
    })
}

fn is_whole(value: f64) -> bool {
    value == value.trunc()
}

/// Undo lost decimal points: `261 7` -> `261.7`
///
/// Only runs when there are more values than expected, and performs at most
/// `values.len() - expected` merges, left to right. A pair merges when the
/// first value is a whole number with magnitude >= 1 and the second is a whole
/// number in 0..=9. Returns the repaired values and the number of merges.
pub fn merge_split_decimals(values: &[f64], expected: usize) -> (Vec<f64>, usize) {
    if values.len() <= expected {
        return (values.to_vec(), 0);
    }

    let excess = values.len() - expected;
    let mut result = Vec::with_capacity(values.len());
    let mut merges = 0;
    let mut i = 0;

    while i < values.len() {
        let current = values[i];
        let mergeable = merges < excess
            && i + 1 < values.len()
            && is_whole(current)
            && current.abs() >= 1.0
            && is_whole(values[i + 1])
            && (0.0..=9.0).contains(&values[i + 1]);

        if mergeable {
            let sign = if current >= 0.0 { 1.0 } else { -1.0 };
            result.push(current + sign * values[i + 1] / 10.0);
            merges += 1;
            i += 2;
        } else {
            result.push(current);
            i += 1;
        }
    }

    (result, merges)
}

impl DataRow {
    /// Reconcile this row with the expected number of values
    ///
    /// Excess values first go through [`merge_split_decimals`]; whatever is
    /// still excess is cut from the end, and missing trailing slots become
    /// `None`. The result always has exactly `expected` entries.
    pub fn fit_to(&self, expected: usize) -> FittedRow {
        let (repaired, merges) = merge_split_decimals(&self.values, expected);

        let truncated = repaired.len().saturating_sub(expected);
        let padded = expected.saturating_sub(repaired.len());

        let mut values: Vec<Option<f64>> = repaired.into_iter().take(expected).map(Some).collect();
        values.resize(expected, None);

        FittedRow {
            values,
            merges,
            truncated,
            padded,
        }
    }
}
