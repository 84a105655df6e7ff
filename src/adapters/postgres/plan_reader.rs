//! PostgreSQL implementation of PlanReader.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::subscription::SubscriptionPlan;
use crate::ports::PlanReader;

pub struct PostgresPlanReader {
    pool: PgPool,
}

impl PostgresPlanReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub billing_period: String,
    pub student_limit: i32,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl TryFrom<PlanRow> for SubscriptionPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(SubscriptionPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            price_cents: row.price_cents,
            billing_period: row.billing_period.parse().map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid plan row: {}", e))
            })?,
            student_limit: non_negative(row.student_limit, "student_limit")?,
            features: row.features,
            is_active: row.is_active,
        })
    }
}

/// Converts a stored INTEGER counter back to `u32`.
pub(super) fn non_negative(value: i32, column: &str) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative {} in store: {}", column, value),
        )
    })
}

#[async_trait]
impl PlanReader for PostgresPlanReader {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, billing_period, student_limit, features, is_active
            FROM subscription_plans
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find plan", e))?;

        row.map(SubscriptionPlan::try_from).transpose()
    }
}
