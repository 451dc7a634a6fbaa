//! Document store trait definition.
//!
//! This module defines the abstract interface to the document database,
//! allowing different backend implementations (MongoDB, in-memory).

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::errors::ApiError;

/// Abstracts the underlying document database.
///
/// Every method is exactly one database primitive. Implementations are shared
/// by the `Restaurant` service for the lifetime of the process; a connectivity
/// failure surfaces as `ApiError::DatabaseError` on the call that hit it.
///
/// # Filters and sorts
///
/// `filter` documents are conjunctions of top-level equality matches
/// (`{"itemtype": "Entree"}`); an empty document matches everything. `sort`
/// documents map field names to `1` (ascending) or `-1` (descending), applied
/// in key order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check that the database is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the database answered
    /// * `Err(ApiError::DatabaseError)` - If it could not be reached
    async fn ping(&self) -> Result<(), ApiError>;

    /// Return every document in `collection` matching `filter`, ordered by
    /// `sort` when given.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, ApiError>;

    /// Return the first document in `collection` matching `filter`, if any.
    async fn find_one(&self, collection: &str, filter: Document)
        -> Result<Option<Document>, ApiError>;

    /// Insert `document` and return the identifier the database assigned.
    ///
    /// Any `_id` already present in `document` is kept.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, ApiError>;

    /// Replace the whole document stored under `id` with `document`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If a document was replaced
    /// * `Err(ApiError::DatabaseError)` - If nothing is stored under `id`
    ///   (e.g. it was deleted after being read) or the replace fails
    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        document: Document,
    ) -> Result<(), ApiError>;

    /// Delete the document stored under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - The number of deleted documents (0 or 1)
    /// * `Err(ApiError::DatabaseError)` - If the deletion fails
    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, ApiError>;

    /// Count the documents in `collection` matching `filter`.
    async fn count(&self, collection: &str, filter: Document) -> Result<u64, ApiError>;
}
