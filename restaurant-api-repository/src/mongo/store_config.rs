//! MongoDB connection configuration.

use std::time::Duration;

/// Default MongoDB endpoint.
pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";

/// Default database holding the restaurant collections.
pub const DEFAULT_DATABASE: &str = "dev";

/// Configuration for the MongoDB store.
#[derive(Debug, Clone)]
pub struct MongoStoreConfig {
    /// Connection string, e.g. "mongodb://localhost:27017".
    pub url: String,
    /// Database holding the `menu_items`, `event_items` and `reviews` collections.
    pub database: String,
    /// Application name reported to the server.
    pub app_name: String,
    /// How long the driver waits for a usable server before failing a call.
    pub server_selection_timeout: Duration,
}

impl Default for MongoStoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MONGO_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: "restaurant-api".to_string(),
            server_selection_timeout: Duration::from_secs(5),
        }
    }
}

impl MongoStoreConfig {
    /// Create a configuration for `url` and `database`, keeping the other defaults.
    ///
    /// # Arguments
    ///
    /// * `url` - The MongoDB connection string
    /// * `database` - The database name
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }
}
