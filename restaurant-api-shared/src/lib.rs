//! # Restaurant API Shared
//!
//! This crate defines the entity value types handed out by the restaurant API:
//! menu items, events and reviews. They are plain immutable values, built by
//! the repository layer on every call and serialized by the HTTP layer.

pub mod types;

pub use types::{EventItem, MenuItem, ReviewItem};
