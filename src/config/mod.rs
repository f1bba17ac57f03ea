//! Configuration module for xvideos-api
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to their defaults.
//!
//! # Example
//!
//! ```no_run
//! use xvideos_api::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("xvideos.toml")).unwrap();
//! println!("Listing pages fetched at once: {}", config.pipeline.page_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ListingConfig, PipelineConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
