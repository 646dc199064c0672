//! Shopdoc Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared plumbing for the shopdoc workspace members:
//!
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Environment**: [`env::EnvReader`] collects every missing required variable
//!   before failing, so a misconfigured run reports all of them at once
//! - **Errors**: [`ConfigError`] for configuration problems detected before any I/O
//!
//! # Example
//!
//! ```no_run
//! use shopdoc_common::env::EnvReader;
//! use shopdoc_common::ConfigResult;
//!
//! fn endpoint() -> ConfigResult<(String, u16)> {
//!     let mut env = EnvReader::from_process();
//!     let host = env.required("MYSQL_HOST");
//!     let port = env.parsed("MYSQL_PORT", 3306u16)?;
//!     env.finish()?;
//!     Ok((host, port))
//! }
//! ```

pub mod env;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{ConfigError, ConfigResult};
