//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, SubscriptionId, Timestamp, TrainerId,
};
use crate::domain::subscription::{ExternalRefs, Subscription, SubscriptionPlan, SubscriptionStatus};
use crate::ports::{SubscriptionRepository, SubscriptionWithPlan};

use super::plan_reader::{non_negative, PlanRow};

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, trainer_id, plan_id, status, current_period_start, current_period_end,
           students_count, cancel_at_period_end, external_subscription_id,
           external_customer_id, created_at, updated_at
    FROM trainer_subscriptions
"#;

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    trainer_id: Uuid,
    plan_id: Uuid,
    status: String,
    current_period_start: DateTime<Utc>,
    current_period_end: DateTime<Utc>,
    students_count: i32,
    cancel_at_period_end: bool,
    external_subscription_id: Option<String>,
    external_customer_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            trainer_id: TrainerId::from_uuid(row.trainer_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            status: parse_status(&row.status)?,
            current_period_start: Timestamp::from_datetime(row.current_period_start),
            current_period_end: Timestamp::from_datetime(row.current_period_end),
            students_count: non_negative(row.students_count, "students_count")?,
            cancel_at_period_end: row.cancel_at_period_end,
            external: ExternalRefs {
                subscription_id: row.external_subscription_id,
                customer_id: row.external_customer_id,
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Subscription columns followed by its plan's columns, prefixed `plan_`.
#[derive(Debug, sqlx::FromRow)]
struct CurrentRow {
    #[sqlx(flatten)]
    subscription: SubscriptionRow,
    plan_name: String,
    plan_price_cents: i64,
    plan_billing_period: String,
    plan_student_limit: i32,
    plan_features: Vec<String>,
    plan_is_active: bool,
}

impl TryFrom<CurrentRow> for SubscriptionWithPlan {
    type Error = DomainError;

    fn try_from(row: CurrentRow) -> Result<Self, Self::Error> {
        let plan = SubscriptionPlan::try_from(PlanRow {
            id: row.subscription.plan_id,
            name: row.plan_name,
            price_cents: row.plan_price_cents,
            billing_period: row.plan_billing_period,
            student_limit: row.plan_student_limit,
            features: row.plan_features,
            is_active: row.plan_is_active,
        })?;
        Ok(SubscriptionWithPlan {
            subscription: Subscription::try_from(row.subscription)?,
            plan,
        })
    }
}

fn parse_status(s: &str) -> Result<SubscriptionStatus, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )
    })
}

fn counter(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::new(ErrorCode::ValidationFailed, "students_count exceeds column range")
    })
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO trainer_subscriptions (
                id, trainer_id, plan_id, status, current_period_start, current_period_end,
                students_count, cancel_at_period_end, external_subscription_id,
                external_customer_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.trainer_id.as_uuid())
        .bind(subscription.plan_id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(subscription.current_period_start.as_datetime())
        .bind(subscription.current_period_end.as_datetime())
        .bind(counter(subscription.students_count)?)
        .bind(subscription.cancel_at_period_end)
        .bind(&subscription.external.subscription_id)
        .bind(&subscription.external.customer_id)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert subscription", e))?;

        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE trainer_subscriptions SET
                status = $2,
                current_period_start = $3,
                current_period_end = $4,
                cancel_at_period_end = $5,
                external_customer_id = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(subscription.current_period_start.as_datetime())
        .bind(subscription.current_period_end.as_datetime())
        .bind(subscription.cancel_at_period_end)
        .bind(&subscription.external.customer_id)
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SUBSCRIPTION))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE external_subscription_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_SUBSCRIPTION
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_current_for_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Option<SubscriptionWithPlan>, DomainError> {
        let row: Option<CurrentRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.trainer_id, s.plan_id, s.status, s.current_period_start,
                   s.current_period_end, s.students_count, s.cancel_at_period_end,
                   s.external_subscription_id, s.external_customer_id,
                   s.created_at, s.updated_at,
                   p.name AS plan_name,
                   p.price_cents AS plan_price_cents,
                   p.billing_period AS plan_billing_period,
                   p.student_limit AS plan_student_limit,
                   p.features AS plan_features,
                   p.is_active AS plan_is_active
            FROM trainer_subscriptions s
            JOIN subscription_plans p ON p.id = s.plan_id
            WHERE s.trainer_id = $1
              AND s.status IN ('trialing', 'active')
            ORDER BY s.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(trainer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find current subscription", e))?;

        row.map(SubscriptionWithPlan::try_from).transpose()
    }

    async fn cancel_entitled_for_trainer(&self, trainer_id: &TrainerId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE trainer_subscriptions
            SET status = 'canceled', updated_at = NOW()
            WHERE trainer_id = $1
              AND status IN ('trialing', 'active')
            "#,
        )
        .bind(trainer_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to cancel subscriptions", e))?;

        Ok(result.rows_affected())
    }

    async fn adjust_student_count(&self, id: &SubscriptionId, delta: i32) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE trainer_subscriptions
            SET students_count = GREATEST(students_count + $2, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to adjust student count", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }
}
