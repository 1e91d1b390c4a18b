use crate::errors::DbError;
use crate::types::DocumentId;
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self { created_at: now, updated_at: now }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored record. `data["_id"]` always mirrors `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: BsonDocument,
    pub metadata: Metadata,
}

impl Document {
    /// Wraps `data` under a fresh id, overwriting any `_id` already present.
    #[must_use]
    pub fn new(mut data: BsonDocument) -> Self {
        let id = DocumentId::new();
        data.insert("_id", Bson::ObjectId(id.0));
        Self { id, data, metadata: Metadata::new() }
    }

    /// Keeps the `_id` carried by `data` (ObjectId or 24-char hex string); generates one if absent.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDocumentId` if `_id` is present but not an ObjectId.
    pub fn from_bson(mut data: BsonDocument) -> Result<Self, DbError> {
        let id = match data.get("_id") {
            None => DocumentId::new(),
            Some(Bson::ObjectId(oid)) => DocumentId(*oid),
            Some(Bson::String(s)) => DocumentId::parse(s)?,
            Some(other) => {
                return Err(DbError::InvalidDocumentId(format!("unsupported _id value: {other}")));
            }
        };
        data.insert("_id", Bson::ObjectId(id.0));
        Ok(Self { id, data, metadata: Metadata::new() })
    }

    pub fn update(&mut self, mut new_data: BsonDocument) {
        new_data.insert("_id", Bson::ObjectId(self.id.0));
        self.data = new_data;
        self.metadata.updated_at = Utc::now();
    }
}
