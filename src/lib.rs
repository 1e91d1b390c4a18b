pub mod adopt;
pub mod collection;
pub mod conditions;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod graphql;
pub mod import;
pub mod query;
pub mod slider;
pub mod types;
pub mod utils;

use crate::collection::Collection;
use crate::document::Document;
use crate::engine::{Engine, EngineOptions};
use crate::errors::DbError;
use crate::query::{Cursor, Filter, FindOptions};
use crate::types::DocumentId;
use bson::Document as BsonDocument;
use std::sync::Arc;

/// The embedded document database backing the adoption resolvers.
pub struct Database {
    engine: Arc<Engine>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty in-memory database.
    #[must_use]
    pub fn new() -> Self {
        Self { engine: Arc::new(Engine::new()) }
    }

    /// Opens a database, loading its seed files.
    ///
    /// # Errors
    /// Returns the first seed import failure.
    pub fn open(options: EngineOptions) -> Result<Self, DbError> {
        Ok(Self { engine: Arc::new(Engine::open(options)?) })
    }

    #[must_use]
    pub fn from_engine(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Creates a new collection with the given name, or returns the existing one.
    pub fn create_collection(&self, name: &str) -> Arc<Collection> {
        self.engine.create_collection(name)
    }

    /// Retrieves a collection by its name.
    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.engine.get_collection(name)
    }

    /// Deletes a collection by its name.
    pub fn delete_collection(&self, name: &str) -> bool {
        self.engine.delete_collection(name)
    }

    /// Lists the names of all collections.
    pub fn list_collection_names(&self) -> Vec<String> {
        self.engine.list_collection_names()
    }

    fn collection(&self, name: &str) -> Result<Arc<Collection>, DbError> {
        self.engine.get_collection(name).ok_or_else(|| DbError::NoSuchCollection(name.to_string()))
    }

    /// Inserts a document into the specified collection.
    ///
    /// # Errors
    /// Returns `NoSuchCollection` if the collection does not exist.
    pub fn insert_document(&self, collection_name: &str, document: Document) -> Result<DocumentId, DbError> {
        Ok(self.collection(collection_name)?.insert_document(document))
    }

    // --- Query API (façade over query module) ---

    /// # Errors
    /// `NoSuchCollection`, or whatever [`query::find_docs`] reports.
    pub fn find(&self, collection_name: &str, filter: &Filter, opts: &FindOptions) -> Result<Cursor, DbError> {
        let col = self.collection(collection_name)?;
        query::find_docs(&col, filter, opts)
    }

    /// Parses a MongoDB-style query document and runs it.
    ///
    /// # Errors
    /// Parse failures (`QueryError`, `InvalidGeometry`) or any [`Database::find`] error.
    pub fn find_doc(&self, collection_name: &str, conditions: &BsonDocument, opts: &FindOptions) -> Result<Cursor, DbError> {
        let filter = query::parse_filter_doc(conditions).inspect_err(|e| {
            query::telemetry::log_query_error(collection_name, e);
        })?;
        self.find(collection_name, &filter, opts)
    }

    /// # Errors
    /// Returns `NoSuchCollection` if the collection does not exist.
    pub fn count(&self, collection_name: &str, filter: &Filter) -> Result<usize, DbError> {
        let col = self.collection(collection_name)?;
        Ok(query::count_docs(&col, filter))
    }

    /// # Errors
    /// Returns `NoSuchCollection` if the collection does not exist.
    pub fn find_by_id(&self, collection_name: &str, id: &DocumentId) -> Result<Option<Document>, DbError> {
        let col = self.collection(collection_name)?;
        Ok(query::find_by_id(&col, id))
    }
}
