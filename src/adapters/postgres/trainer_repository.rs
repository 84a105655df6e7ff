//! PostgreSQL implementation of TrainerRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, IdentityId, Timestamp, TrainerId};
use crate::domain::trainer::{Cpf, Phone, Trainer};
use crate::ports::TrainerRepository;

const CPF_CONSTRAINT: &str = "personal_trainers_cpf_key";
const EMAIL_CONSTRAINT: &str = "personal_trainers_email_key";

pub struct PostgresTrainerRepository {
    pool: PgPool,
}

impl PostgresTrainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_TRAINER: &str = r#"
    SELECT id, identity_id, name, cpf, email, phone, birth_date, cref,
           specializations, is_active, must_reset_password, created_at
    FROM personal_trainers
"#;

#[derive(Debug, sqlx::FromRow)]
struct TrainerRow {
    id: Uuid,
    identity_id: String,
    name: String,
    cpf: String,
    email: String,
    phone: Option<String>,
    birth_date: Option<NaiveDate>,
    cref: Option<String>,
    specializations: Vec<String>,
    is_active: bool,
    must_reset_password: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrainerRow> for Trainer {
    type Error = DomainError;

    fn try_from(row: TrainerRow) -> Result<Self, Self::Error> {
        Ok(Trainer {
            id: TrainerId::from_uuid(row.id),
            identity_id: IdentityId::new(row.identity_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid identity_id: {}", e))
            })?,
            name: row.name,
            cpf: Cpf::from_digits(row.cpf.trim()),
            email: row.email,
            phone: row.phone.map(Phone::from_digits),
            birth_date: row.birth_date,
            cref: row.cref,
            specializations: row.specializations,
            is_active: row.is_active,
            must_reset_password: row.must_reset_password,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Maps unique violations on the trainer table to conflict codes.
fn insert_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some(CPF_CONSTRAINT) => {
                return DomainError::new(ErrorCode::DuplicateCpf, db_err.message().to_string())
            }
            Some(EMAIL_CONSTRAINT) => {
                return DomainError::new(ErrorCode::DuplicateEmail, db_err.message().to_string())
            }
            _ => {}
        }
    }
    DomainError::database("Failed to insert trainer", e)
}

#[async_trait]
impl TrainerRepository for PostgresTrainerRepository {
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO personal_trainers (
                id, identity_id, name, cpf, email, phone, birth_date, cref,
                specializations, is_active, must_reset_password, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(trainer.id.as_uuid())
        .bind(trainer.identity_id.as_str())
        .bind(&trainer.name)
        .bind(trainer.cpf.digits())
        .bind(&trainer.email)
        .bind(trainer.phone.as_ref().map(|p| p.digits()))
        .bind(trainer.birth_date)
        .bind(&trainer.cref)
        .bind(&trainer.specializations)
        .bind(trainer.is_active)
        .bind(trainer.must_reset_password)
        .bind(trainer.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        let row: Option<TrainerRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_TRAINER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find trainer", e))?;

        row.map(Trainer::try_from).transpose()
    }

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Trainer>, DomainError> {
        let row: Option<TrainerRow> = sqlx::query_as(&format!("{} WHERE cpf = $1", SELECT_TRAINER))
            .bind(cpf.digits())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find trainer by CPF", e))?;

        row.map(Trainer::try_from).transpose()
    }

    async fn find_by_identity(&self, identity: &IdentityId) -> Result<Option<Trainer>, DomainError> {
        let row: Option<TrainerRow> =
            sqlx::query_as(&format!("{} WHERE identity_id = $1", SELECT_TRAINER))
                .bind(identity.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to find trainer by identity", e))?;

        row.map(Trainer::try_from).transpose()
    }
}
