//! Configuration module for Channel-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use channel_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Crawling channel: {}", config.channel.root);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ChannelConfig, ClientConfig, Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::validate;
