//! PostgreSQL implementation of StudentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, StudentId, Timestamp, TrainerId};
use crate::domain::trainer::{Phone, Student};
use crate::ports::StudentRepository;

pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    trainer_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: StudentId::from_uuid(row.id),
            trainer_id: TrainerId::from_uuid(row.trainer_id),
            name: row.name,
            email: row.email,
            phone: row.phone.map(Phone::from_digits),
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO students (id, trainer_id, name, email, phone, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(student.id.as_uuid())
        .bind(student.trainer_id.as_uuid())
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.phone.as_ref().map(|p| p.digits()))
        .bind(student.is_active)
        .bind(student.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return DomainError::new(ErrorCode::TrainerNotFound, "Trainer not found");
                }
            }
            DomainError::database("Failed to insert student", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, trainer_id, name, email, phone, is_active, created_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find student", e))?;

        Ok(row.map(Student::from))
    }

    async fn deactivate(&self, id: &StudentId) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE students SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to deactivate student", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active(&self, trainer_id: &TrainerId) -> Result<u32, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE trainer_id = $1 AND is_active")
                .bind(trainer_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to count students", e))?;

        u32::try_from(count).map_err(|_| {
            DomainError::new(ErrorCode::DatabaseError, format!("Student count out of range: {}", count))
        })
    }
}
