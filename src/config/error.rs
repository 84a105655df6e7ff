//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("A database is required in production")]
    DatabaseRequiredInProduction,

    #[error("Identity service URL must use HTTPS in production")]
    IdentityUrlMustBeHttps,

    #[error("JWT secret must be at least 32 characters")]
    JwtSecretTooShort,

    #[error("Invalid super-admin email address")]
    InvalidSuperAdminEmail,

    #[error("Temporary password must be at least 6 characters")]
    TemporaryPasswordTooShort,
}
