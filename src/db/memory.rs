use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::RecordStore;
use crate::errors::AppError;
use crate::models::upload::{NewUploadRecord, UploadRecord};

/// In-process store used by handler tests.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<UploadRecord>>,
}

impl MemoryRecordStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UploadRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.email == email).cloned())
    }

    async fn insert(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let record = record.into_record(Utc::now());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

/// Stands in for a lost database connection. Inserts and listing always fail;
/// lookups fail too unless built with `on_write`.
pub struct FailingRecordStore {
    lookups_fail: bool,
}

impl FailingRecordStore {
    pub fn always() -> Self {
        FailingRecordStore { lookups_fail: true }
    }

    pub fn on_write() -> Self {
        FailingRecordStore { lookups_fail: false }
    }

    fn error() -> AppError {
        AppError::DatabaseError("connection refused".to_string())
    }
}

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<UploadRecord>, AppError> {
        if self.lookups_fail {
            return Err(Self::error());
        }
        Ok(None)
    }

    async fn insert(&self, _record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        Err(Self::error())
    }

    async fn list_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        Err(Self::error())
    }
}
