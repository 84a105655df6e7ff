//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter module (`dto`, `handlers`, `routes`);
//! `router` assembles them behind the shared middleware stack.

pub mod billing;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
pub mod student;
pub mod subscription;
pub mod trainer;

pub use error::{ApiError, ErrorResponse};
pub use router::build_router;
pub use state::AppState;
