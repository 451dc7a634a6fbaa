//! Restaurant API error types.
//!
//! Every operation of the API reports failures through `ApiError`. The variant
//! is the error kind callers branch on; the message only aids diagnostics.

use thiserror::Error;

/// Unified errors from restaurant API operations.
///
/// Used by the `RestaurantApi` and `DocumentStore` traits alike.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Connection failure, unknown identifier, malformed identifier or a
    /// failed database operation.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored document is missing a field or has one of the wrong type, or
    /// a caller supplied an empty required field.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rejected credentials. Only raised at the authentication boundary.
    #[error("Auth error: {0}")]
    AuthError(String),
}

impl ApiError {
    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a database error for a by-identifier lookup that matched nothing.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::DatabaseError(format!(
            "No document in {} with id {}",
            collection, id
        ))
    }

    pub fn is_database(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthError(_))
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}
