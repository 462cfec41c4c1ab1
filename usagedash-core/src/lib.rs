//! Core shared library for the usagedash client.
//!
//! Hosts the pieces every other crate leans on: the common error type,
//! configuration loading, tracing setup and JSON helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{DashboardConfig, Environment};
pub use errors::{ConfigError, UsageDashError};
