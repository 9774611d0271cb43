// OCR-tolerant table parsing
//
// Pipeline for one page of text:
// - line_classifier: decides which raw lines are numeric data rows
// - row_extractor: turns a data line into a height + values, with decimal repair
// - page_segmenter: splits the page's rows into five seasonal blocks

pub mod line_classifier;
pub mod page_segmenter;
pub mod row_extractor;

pub use line_classifier::is_data_line;
pub use page_segmenter::{segment_page, SeasonBlock, SegmentError, Segmentation};
pub use row_extractor::{extract_row, merge_split_decimals, DataRow, RowExtractError};
