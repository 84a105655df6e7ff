//! HTTP DTOs for webhook deliveries.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned for every delivery that parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
