//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation and identity account management
//! - `http` - axum REST surface
//! - `memory` - In-memory store for tests and database-less runs
//! - `postgres` - PostgreSQL store

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
