//! Configuration module for Page-Harvest
//!
//! This module handles loading, parsing, and validating TOML or YAML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use page_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Harvest will use {} workers", config.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractionRules, DEFAULT_MAX_WORKERS, DEFAULT_REQUEST_TIMEOUT_SECS, PAGE_PLACEHOLDER,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, ConfigFormat};
pub use validation::validate_extraction_rules;
