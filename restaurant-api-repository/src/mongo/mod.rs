//! MongoDB implementation of the document store.
//!
//! This module provides a concrete implementation of `DocumentStore`
//! using the official MongoDB driver.

mod store;
mod store_config;

pub use store::MongoStore;
pub use store_config::{MongoStoreConfig, DEFAULT_DATABASE, DEFAULT_MONGO_URL};
