use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::upload::{NewUploadRecord, UploadRecord};

#[cfg(test)]
pub mod memory;

const CREATE_TABLE_SQL: &str = include_str!("schema.sql");
const CREATE_EMAIL_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS uploads_email_idx ON uploads (email)";

const SELECT_COLUMNS: &str = "id, name, email, image_url, created_at, updated_at";

/// Persistence for upload records. Email uniqueness is the caller's concern.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UploadRecord>, AppError>;

    async fn insert(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError>;

    /// Returns every record in natural storage order.
    async fn list_all(&self) -> Result<Vec<UploadRecord>, AppError>;
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(PgRecordStore { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_EMAIL_INDEX_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UploadRecord>, AppError> {
        let sql = format!("SELECT {} FROM uploads WHERE email = $1 LIMIT 1", SELECT_COLUMNS);
        sqlx::query_as::<_, UploadRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| AppError::DatabaseError(err.to_string()))
    }

    async fn insert(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let record = record.into_record(Utc::now());
        let sql = format!(
            "INSERT INTO uploads ({}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SELECT_COLUMNS, SELECT_COLUMNS
        );
        sqlx::query_as::<_, UploadRecord>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.image_url)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| AppError::DatabaseError(err.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        let sql = format!("SELECT {} FROM uploads", SELECT_COLUMNS);
        sqlx::query_as::<_, UploadRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| AppError::DatabaseError(err.to_string()))
    }
}
