pub mod digitize_service;

pub use digitize_service::{DigitizeService, PageEvent};
