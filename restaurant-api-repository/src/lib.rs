//! # Restaurant API Repository
//!
//! This crate provides the data-access layer of the restaurant API. It
//! includes the API contract, the document database boundary with MongoDB
//! and in-memory implementations, error definitions, and the credential
//! scaffolding used by the HTTP layer.

pub mod auth;
pub mod clock;
pub mod codec;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod mongo;
pub mod service;
pub mod types;
pub mod utils;

pub use auth::{setup_auth, Credentials, CredentialsPlugin, JwtCredentials, UserProfile};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::RestaurantServiceConfig;
pub use errors::ApiError;
pub use interfaces::{DocumentStore, RestaurantApi};
pub use memory::MemoryStore;
pub use mongo::{MongoStore, MongoStoreConfig};
pub use service::Restaurant;
pub use types::{EventEdit, MenuItemEdit, NewEvent, NewMenuItem, NewReview, ReviewEdit};
pub use utils::parse_object_id;
