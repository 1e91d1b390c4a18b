use crate::collection::Collection;
use crate::errors::DbError;
use crate::import::{ImportOptions, ImportReport, import_file};
use crate::types::CollectionName;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// NDJSON files loaded at open, as `(collection, path)` pairs.
    pub seed_files: Vec<(CollectionName, PathBuf)>,
    /// Fields that receive a 2dsphere index when their collection is created.
    pub geo_indexes: Vec<(CollectionName, String)>,
}

/// The in-memory engine: a registry of named collections.
#[derive(Default)]
pub struct Engine {
    pub(crate) options: EngineOptions,
    pub(crate) collections: RwLock<HashMap<CollectionName, Arc<Collection>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("collections", &self.list_collection_names())
            .finish()
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an engine and loads every seed file.
    ///
    /// # Errors
    /// Returns the first import failure (unreadable file, or a bad record when
    /// errors are not skipped).
    pub fn open(options: EngineOptions) -> Result<Self, DbError> {
        let engine = Self { options: options.clone(), collections: RwLock::new(HashMap::new()) };
        for (collection, path) in &options.seed_files {
            let opts = ImportOptions { collection: collection.clone(), ..ImportOptions::default() };
            let report: ImportReport = import_file(&engine, path, &opts)?;
            log::info!(
                "seeded {} from {}: inserted={} skipped={}",
                collection,
                path.display(),
                report.inserted,
                report.skipped
            );
        }
        Ok(engine)
    }

    /// Returns the named collection, creating it (and its configured geo indexes) if needed.
    pub fn create_collection(&self, name: &str) -> Arc<Collection> {
        if let Some(existing) = self.collections.read().get(name) {
            return existing.clone();
        }
        let mut map = self.collections.write();
        map.entry(name.to_string())
            .or_insert_with(|| {
                let col = Arc::new(Collection::new(name.to_string()));
                for (c, field) in &self.options.geo_indexes {
                    if c == name {
                        col.create_geo_index(field);
                    }
                }
                col
            })
            .clone()
    }

    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    pub fn delete_collection(&self, name: &str) -> bool {
        self.collections.write().remove(name).is_some()
    }

    pub fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// # Errors
    /// Fails if `old` does not exist or `new` is taken.
    pub fn rename_collection(&self, old: &str, new: &str) -> Result<(), DbError> {
        let mut map = self.collections.write();
        if map.contains_key(new) {
            return Err(DbError::CollectionAlreadyExists(new.to_string()));
        }
        let col = map.remove(old).ok_or_else(|| DbError::NoSuchCollection(old.to_string()))?;
        col.set_name(new.to_string());
        map.insert(new.to_string(), col);
        Ok(())
    }
}
