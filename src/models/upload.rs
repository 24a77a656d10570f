use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the upload flow; id and timestamps are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUploadRecord {
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl NewUploadRecord {
    pub fn into_record(self, now: DateTime<Utc>) -> UploadRecord {
        UploadRecord {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = NewUploadRecord {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            image_url: "http://localhost:5001/uploads/1700000000000.png".into(),
        }
        .into_record(Utc::now());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["imageUrl"], "http://localhost:5001/uploads/1700000000000.png");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("image_url").is_none());
        assert_eq!(record.created_at, record.updated_at);
    }
}
