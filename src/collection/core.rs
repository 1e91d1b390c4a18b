use super::index_admin::IndexKind;
use crate::document::Document;
use crate::types::DocumentId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Documents keyed by id, plus the order they were inserted in.
#[derive(Default)]
pub(crate) struct Slots {
    pub(crate) order: Vec<DocumentId>,
    pub(crate) docs: HashMap<DocumentId, Document>,
}

pub struct Collection {
    pub name: Arc<RwLock<String>>,
    pub(crate) slots: RwLock<Slots>,
    pub(crate) indexes: RwLock<BTreeMap<String, IndexKind>>,
}

impl Collection {
    pub fn new(name: String) -> Self {
        Self {
            name: Arc::new(RwLock::new(name)),
            slots: RwLock::new(Slots::default()),
            indexes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn set_name(&self, new_name: String) {
        *self.name.write() = new_name;
    }

    /// Returns the collection's name as a String (cloned), hiding the `RwLock`.
    pub fn name_str(&self) -> String {
        self.name.read().clone()
    }
}
