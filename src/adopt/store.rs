use crate::Database;
use crate::document::Document;
use crate::errors::DbError;
use crate::query::FindOptions;
use crate::types::DocumentId;
use async_trait::async_trait;
use bson::Document as BsonDocument;
use std::sync::Arc;

pub const ADOPT_COLLECTION: &str = "adopts";

/// What the adoption resolvers need from persistence.
#[async_trait]
pub trait AdoptStore: Send + Sync {
    /// Runs a MongoDB-style query document with skip/limit.
    async fn find(&self, conditions: BsonDocument, opts: FindOptions) -> Result<Vec<Document>, DbError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DbError>;
}

/// The `adopts` collection of an embedded [`Database`], with its `location` geo index.
#[derive(Clone)]
pub struct AdoptModel {
    db: Arc<Database>,
    collection: String,
}

impl AdoptModel {
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_collection(db, ADOPT_COLLECTION)
    }

    #[must_use]
    pub fn with_collection(db: Arc<Database>, collection: &str) -> Self {
        db.create_collection(collection).create_geo_index("location");
        Self { db, collection: collection.to_string() }
    }

    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl AdoptStore for AdoptModel {
    async fn find(&self, conditions: BsonDocument, opts: FindOptions) -> Result<Vec<Document>, DbError> {
        Ok(self.db.find_doc(&self.collection, &conditions, &opts)?.to_vec())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DbError> {
        self.db.find_by_id(&self.collection, id)
    }
}
