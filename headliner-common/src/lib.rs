//! # Headliner Common Library
//!
//! Shared code for the headliner selection tools including:
//! - Error type used by every computation
//! - TOML configuration and config-file resolution
//! - Tracing subscriber bootstrap

pub mod config;
pub mod error;
pub mod logging;

pub use config::TomlConfig;
pub use error::{Error, Result};
