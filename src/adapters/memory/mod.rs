//! In-memory store adapter.
//!
//! Implements every store port over process memory. Backs the test suite
//! and local runs without a database.

mod store;

pub use store::InMemoryStore;
