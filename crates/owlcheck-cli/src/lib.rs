//! # owlcheck CLI
//!
//! Command-line front end: resolve ontologies, validate data files against
//! them, store resolved ontologies and ingested data, and inspect the results.

pub mod commands;
pub mod config;

pub use commands::*;
pub use config::{Config, ConfigError};
