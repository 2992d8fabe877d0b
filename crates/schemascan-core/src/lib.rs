//! Schemascan Core - Foundation crate for the schemascan service.
//!
//! This crate provides configuration management and the shared error types
//! that all other schemascan crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//!
//! # Example
//!
//! ```rust
//! use schemascan_core::AppConfig;
//!
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//! assert_eq!(config.scan.max_visible_chars, 10_000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, LlmConfig, ScanConfig, ServerConfig};
pub use error::{ConfigError, ConfigResult};
