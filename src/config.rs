use std::env;
use std::path::PathBuf;

use crate::reference::PageLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub pages_dir: PathBuf,
    pub output_path: PathBuf,
    pub first_data_page: u32,
    pub last_data_page: u32,
}

impl Default for Config {
    fn default() -> Self {
        let layout = PageLayout::default();
        Config {
            pages_dir: PathBuf::from("pages"),
            output_path: PathBuf::from("gost_54084.json"),
            first_data_page: layout.first_page,
            last_data_page: layout.last_page,
        }
    }
}

impl Config {
    /// Read settings from the environment; unset or invalid values use defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            pages_dir: env::var("PAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.pages_dir),
            output_path: env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            first_data_page: env::var("FIRST_DATA_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.first_data_page),
            last_data_page: env::var("LAST_DATA_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.last_data_page),
        }
    }

    pub fn page_layout(&self) -> PageLayout {
        PageLayout::new(self.first_data_page, self.last_data_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["PAGES_DIR", "OUTPUT_PATH", "FIRST_DATA_PAGE", "LAST_DATA_PAGE"];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_layout().page_count(), 108);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("PAGES_DIR", "/data/gost/pages");
        env::set_var("FIRST_DATA_PAGE", "10");
        env::set_var("LAST_DATA_PAGE", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.pages_dir, PathBuf::from("/data/gost/pages"));
        assert_eq!(config.first_data_page, 10);
        assert_eq!(config.last_data_page, 116);
        clear_env();
    }
}
