//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRAINER_HUB` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use trainer_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod admin;
mod auth;
mod billing;
mod database;
mod error;
mod server;

pub use admin::AdminConfig;
pub use auth::AuthConfig;
pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{AllowedOrigins, Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. Without it the service runs on the in-memory
    /// store, which is only allowed outside production.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Identity service configuration (bearer tokens, admin API)
    pub auth: AuthConfig,

    /// Super-admin and trainer provisioning
    pub admin: AdminConfig,

    /// Billing webhook settings
    #[serde(default)]
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRAINER_HUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRAINER_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TRAINER_HUB__DATABASE__URL=...` -> `database.url = ...`
    /// - `TRAINER_HUB__ADMIN__SUPER_ADMIN_EMAIL=...` -> `admin.super_admin_email = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRAINER_HUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        match &self.database {
            Some(database) => database.validate()?,
            None if self.is_production() => {
                return Err(ValidationError::DatabaseRequiredInProduction)
            }
            None => {}
        }
        self.auth.validate(&self.server.environment)?;
        self.admin.validate()?;
        self.billing.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
