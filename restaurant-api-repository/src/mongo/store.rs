//! MongoDB store implementation.
//!
//! This module provides the concrete implementation of `DocumentStore`
//! using the `mongodb` crate.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ClientOptions,
    Client, Collection, Database,
};
use tracing::{debug, error, info};

use crate::codec::ID;
use crate::errors::ApiError;
use crate::interfaces::DocumentStore;
use crate::mongo::store_config::MongoStoreConfig;

/// MongoDB store.
///
/// Holds one driver `Client`, which pools connections internally. Build it
/// once at start-up and share it; every call checks a connection out of the
/// pool, so an unreachable server fails only the call that needed it.
///
/// # Example
///
/// ```ignore
/// use restaurant_api_repository::mongo::{MongoStore, MongoStoreConfig};
///
/// let store = MongoStore::new(MongoStoreConfig::default()).await?;
/// store.ping().await?;
/// ```
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Create a new store for the configured endpoint and database.
    ///
    /// Parsing the connection string may resolve DNS seed lists but does not
    /// contact the server; use [`DocumentStore::ping`] to check connectivity.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, database and driver settings
    ///
    /// # Returns
    ///
    /// * `Ok(MongoStore)` - A new store instance
    /// * `Err(ApiError::DatabaseError)` - If the connection string is invalid
    pub async fn new(config: MongoStoreConfig) -> Result<Self, ApiError> {
        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            ApiError::database(format!("Invalid MongoDB url {}: {}", config.url, e))
        })?;
        options.app_name = Some(config.app_name.clone());
        options.server_selection_timeout = Some(config.server_selection_timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        info!(
            url = %config.url,
            database = %config.database,
            "Created MongoDB store"
        );

        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    /// Close the pooled connections. Outstanding calls finish first.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), ApiError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                error!(error = %e, "Could not connect to the database");
                ApiError::database(e.to_string())
            })?;

        debug!(database = %self.database.name(), "Database answered ping");
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, ApiError> {
        let coll = self.collection(collection);
        let mut action = coll.find(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }

        let documents: Vec<Document> = action.await?.try_collect().await?;

        debug!(collection = %collection, count = documents.len(), "Fetched documents");
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, ApiError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, ApiError> {
        let result = self.collection(collection).insert_one(document).await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            error!(collection = %collection, id = %result.inserted_id, "Did not retrieve ObjectId");
            ApiError::database(format!(
                "Inserted id {} is not an ObjectId",
                result.inserted_id
            ))
        })
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        document: Document,
    ) -> Result<(), ApiError> {
        let result = self
            .collection(collection)
            .replace_one(doc! { ID: id }, document)
            .await?;

        if result.matched_count == 0 {
            return Err(ApiError::not_found(collection, &id.to_hex()));
        }

        debug!(collection = %collection, id = %id, "Replaced document");
        Ok(())
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<u64, ApiError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { ID: id })
            .await?;

        debug!(collection = %collection, id = %id, deleted = result.deleted_count, "Deleted document");
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, ApiError> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// A store pointed at a port nothing listens on.
    async fn unreachable_store() -> MongoStore {
        let config = MongoStoreConfig {
            server_selection_timeout: Duration::from_millis(200),
            ..MongoStoreConfig::new("mongodb://127.0.0.1:1/?directConnection=true", "dev")
        };
        MongoStore::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let result = MongoStore::new(MongoStoreConfig::new("not-a-mongo-url", "dev")).await;
        assert!(matches!(result, Err(ApiError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_database_error() {
        let store = unreachable_store().await;

        assert!(store.ping().await.unwrap_err().is_database());
        assert!(store
            .find("reviews", doc! { "parentid": "p" }, Some(doc! { "date": -1 }))
            .await
            .unwrap_err()
            .is_database());
        assert!(store
            .find("menu_items", doc! {}, None)
            .await
            .unwrap_err()
            .is_database());
        assert!(store
            .replace_one("event_items", ObjectId::new(), doc! {})
            .await
            .unwrap_err()
            .is_database());
    }
}
