use thiserror::Error;
use tracing::{debug, info};

use crate::ocr::line_classifier::is_data_line;
use crate::ocr::page_segmenter::{segment_page, SegmentError, Segmentation};
use crate::ocr::row_extractor::{extract_row, DataRow};
use crate::reference::{HEIGHTS, ROWS_PER_PAGE};
use crate::utils::{strip_line_prefix, text_lines};

#[derive(Error, Debug, PartialEq)]
pub enum PageParseError {
    #[error("Page {page_num}: {source}")]
    Segmentation {
        page_num: u32,
        #[source]
        source: SegmentError,
    },
}

/// Line-level counts for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStats {
    pub lines: usize,
    /// Lines that passed the classifier
    pub data_lines: usize,
    /// Data lines whose numbers could not be extracted
    pub malformed_lines: usize,
    /// Extracted rows whose height is not a table level
    pub off_grid_rows: usize,
    /// Rows handed to the segmenter
    pub rows: usize,
}

/// Classified rows of a page before segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPage {
    pub rows: Vec<DataRow>,
    pub stats: PageStats,
}

/// Fully parsed data page
#[derive(Debug, Clone, PartialEq)]
pub struct PageTable {
    pub page_num: u32,
    pub expected_values: usize,
    pub stats: PageStats,
    pub segmentation: Segmentation,
}

/// Classify and extract the data rows of a page
pub fn collect_rows(text: &str) -> ClassifiedPage {
    let mut stats = PageStats::default();
    let mut rows = Vec::new();

    for (line_idx, raw_line) in text_lines(text).enumerate() {
        stats.lines += 1;
        let line = strip_line_prefix(raw_line.trim());
        if !is_data_line(line) {
            continue;
        }
        stats.data_lines += 1;

        match extract_row(line) {
            Ok(row) if HEIGHTS.contains(&row.height) => rows.push(row),
            Ok(row) => {
                debug!(
                    "Line {}: height {} is not a table level, skipping",
                    line_idx + 1,
                    row.height
                );
                stats.off_grid_rows += 1;
            }
            Err(e) => {
                debug!("Line {}: {} - {}", line_idx + 1, line, e);
                stats.malformed_lines += 1;
            }
        }
    }

    stats.rows = rows.len();
    ClassifiedPage { rows, stats }
}

/// Parse one page of OCR text into seasonal blocks
///
/// `expected_values` is the number of values per row for the page's
/// longitude group (two per location).
pub fn parse_page_text(
    page_num: u32,
    text: &str,
    expected_values: usize,
) -> Result<PageTable, PageParseError> {
    let ClassifiedPage { rows, stats } = collect_rows(text);

    if rows.len() != ROWS_PER_PAGE {
        info!(
            "Page {}: found {} data rows (expected {})",
            page_num,
            rows.len(),
            ROWS_PER_PAGE
        );
    }

    let segmentation = segment_page(&rows, expected_values)
        .map_err(|source| PageParseError::Segmentation { page_num, source })?;

    debug!(
        "Page {}: {} seasons, {:?}, {} merges",
        page_num,
        segmentation.blocks.len(),
        segmentation.strategy,
        segmentation.merges
    );

    Ok(PageTable {
        page_num,
        expected_values,
        stats,
        segmentation,
    })
}
