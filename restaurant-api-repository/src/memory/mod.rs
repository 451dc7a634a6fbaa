//! In-memory implementation of the document store.
//!
//! `MemoryStore` keeps documents in process with the same filter, sort and
//! identifier semantics as MongoDB. Use it for tests and local development.

mod store;

pub use store::MemoryStore;
