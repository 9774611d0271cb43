// ! Page text importers: OCR page dumps in, parsed seasonal tables out

pub mod page_parser;
pub mod page_source;

// Re-export commonly used items
pub use page_parser::{parse_page_text, PageParseError, PageStats, PageTable};
pub use page_source::{DirectoryPageSource, InMemoryPageSource, PageSource, PageSourceError};
