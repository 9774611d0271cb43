pub mod assembler;
pub mod config;
pub mod dataset;
pub mod export;
pub mod importers;
pub mod ocr;
pub mod reference;
pub mod services;
pub mod utils;
pub mod validation;
