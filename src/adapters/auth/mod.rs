//! Identity adapters.
//!
//! Implementations of the `SessionValidator` and `IdentityProvider` ports:
//!
//! - `jwt` - Shared-secret bearer token validation
//! - `identity_admin` - Account management over the identity service admin API
//! - `mock` - Test implementations that don't require external services

mod identity_admin;
mod jwt;
mod mock;

pub use identity_admin::IdentityAdminClient;
pub use jwt::JwtSessionValidator;
pub use mock::{MockIdentityProvider, MockSessionValidator};
