//! Stored webhook integration settings.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::DomainError;

/// Integration settings for one billing provider.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub provider: String,
    pub enabled: bool,
    /// Signing secret; when absent only the header's presence is checked.
    pub signing_secret: Option<SecretString>,
}

#[async_trait]
pub trait WebhookConfigReader: Send + Sync {
    async fn find_by_provider(&self, provider: &str) -> Result<Option<WebhookConfig>, DomainError>;
}
