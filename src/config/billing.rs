//! Billing webhook configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Billing webhook configuration
///
/// Signing secrets and the enabled flag live in the `webhook_configs` table;
/// this only names which row the webhook endpoint reads.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Provider key of the stored webhook configuration
    #[serde(default = "default_webhook_provider")]
    pub webhook_provider: String,
}

impl BillingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_provider.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__WEBHOOK_PROVIDER"));
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            webhook_provider: default_webhook_provider(),
        }
    }
}

fn default_webhook_provider() -> String {
    "stripe".to_string()
}
