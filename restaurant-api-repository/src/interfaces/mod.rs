//! Interface definitions for the restaurant API.
//!
//! `RestaurantApi` is the contract the HTTP layer consumes; `DocumentStore`
//! abstracts the document database behind it so backends can be swapped and
//! tests can run without a server.

mod document_store;
mod restaurant_api;

pub use document_store::DocumentStore;
pub use restaurant_api::RestaurantApi;
