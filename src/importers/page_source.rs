use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::utils::page_file_name;

#[derive(Error, Debug)]
pub enum PageSourceError {
    #[error("Failed to read page file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provider of per-page OCR text, addressed by page number
///
/// A page that does not exist is `Ok(None)`, not an error.
pub trait PageSource {
    fn read_page(&self, page_num: u32) -> Result<Option<String>, PageSourceError>;
}

/// Page dumps stored as `<dir>/page_NNN.txt`
#[derive(Debug, Clone)]
pub struct DirectoryPageSource {
    dir: PathBuf,
}

impl DirectoryPageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(&self, page_num: u32) -> PathBuf {
        self.dir.join(page_file_name(page_num))
    }
}

impl PageSource for DirectoryPageSource {
    fn read_page(&self, page_num: u32) -> Result<Option<String>, PageSourceError> {
        let path = self.page_path(page_num);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Read {} bytes from {}", text.len(), path.display());
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PageSourceError::Io { path, source }),
        }
    }
}

/// Page texts held in memory (fixtures, tooling)
#[derive(Debug, Clone, Default)]
pub struct InMemoryPageSource {
    pages: BTreeMap<u32, String>,
}

impl InMemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page_num: u32, text: impl Into<String>) {
        self.pages.insert(page_num, text.into());
    }

    pub fn with_page(mut self, page_num: u32, text: impl Into<String>) -> Self {
        self.insert(page_num, text);
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageSource for InMemoryPageSource {
    fn read_page(&self, page_num: u32) -> Result<Option<String>, PageSourceError> {
        Ok(self.pages.get(&page_num).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_source_reads_and_misses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page_009.txt"), "10 1 2\n").unwrap();

        let source = DirectoryPageSource::new(dir.path());
        assert_eq!(source.read_page(9).unwrap().as_deref(), Some("10 1 2\n"));
        assert!(source.read_page(10).unwrap().is_none());
    }

    #[test]
    fn test_directory_source_invalid_utf8_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page_012.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let source = DirectoryPageSource::new(dir.path());
        match source.read_page(12) {
            Err(PageSourceError::Io { path, .. }) => {
                assert!(path.ends_with("page_012.txt"));
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemoryPageSource::new().with_page(20, "text");
        assert_eq!(source.len(), 1);
        assert_eq!(source.read_page(20).unwrap().as_deref(), Some("text"));
        assert!(source.read_page(21).unwrap().is_none());
    }
}
