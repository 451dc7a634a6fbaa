//! Error types for the restaurant API repository.
//!
//! This module provides the single error type returned by every operation.

mod api_error;

pub use api_error::ApiError;
