//! # Restaurant API
//!
//! Process wiring for the restaurant API: reads configuration from the
//! environment, connects to MongoDB, registers credential plugins and hands
//! out a shared `Restaurant` for the HTTP layer.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`check`]: Start-up check of the restaurant collections

pub mod check;
pub mod config;

pub use check::{StartupCheck, StartupReport};
pub use config::{ConnectionMode, Dependencies, Settings};

use restaurant_api_repository::ApiError;
use thiserror::Error;

/// Errors that can occur during service initialization.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] ApiError),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
