//! PostgreSQL implementation of WebhookConfigReader.

use async_trait::async_trait;
use secrecy::SecretString;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{WebhookConfig, WebhookConfigReader};

pub struct PostgresWebhookConfigReader {
    pool: PgPool,
}

impl PostgresWebhookConfigReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WebhookConfigRow {
    provider: String,
    enabled: bool,
    signing_secret: Option<String>,
}

impl From<WebhookConfigRow> for WebhookConfig {
    fn from(row: WebhookConfigRow) -> Self {
        WebhookConfig {
            provider: row.provider,
            enabled: row.enabled,
            signing_secret: row
                .signing_secret
                .filter(|s| !s.trim().is_empty())
                .map(SecretString::new),
        }
    }
}

#[async_trait]
impl WebhookConfigReader for PostgresWebhookConfigReader {
    async fn find_by_provider(&self, provider: &str) -> Result<Option<WebhookConfig>, DomainError> {
        let row: Option<WebhookConfigRow> = sqlx::query_as(
            "SELECT provider, enabled, signing_secret FROM webhook_configs WHERE provider = $1",
        )
        .bind(provider)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load webhook configuration", e))?;

        Ok(row.map(WebhookConfig::from))
    }
}
