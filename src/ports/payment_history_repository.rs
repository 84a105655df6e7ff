//! Payment history port (append-only).

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::PaymentRecord;

#[async_trait]
pub trait PaymentHistoryRepository: Send + Sync {
    async fn append(&self, record: &PaymentRecord) -> Result<(), DomainError>;
}
