//! PostgreSQL implementation of PaymentHistoryRepository.
//!
//! Rows are only ever inserted; `status` holds `PaymentStatus::as_str`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::PaymentRecord;
use crate::ports::PaymentHistoryRepository;

pub struct PostgresPaymentHistoryRepository {
    pool: PgPool,
}

impl PostgresPaymentHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentHistoryRepository for PostgresPaymentHistoryRepository {
    async fn append(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_history (
                id, subscription_id, status, amount_cents, currency,
                external_invoice_id, paid_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.subscription_id.as_uuid())
        .bind(record.status.as_str())
        .bind(record.amount_cents)
        .bind(&record.currency)
        .bind(&record.external_invoice_id)
        .bind(record.paid_at.map(|t| *t.as_datetime()))
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record payment", e))?;

        Ok(())
    }
}
