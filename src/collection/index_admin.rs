use super::core::Collection;

/// Secondary index kinds the store knows about. Only geospatial indexes change query behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Sphere2d,
}

impl Collection {
    // --- Index admin helpers ---
    pub fn create_index(&self, field: &str, kind: IndexKind) {
        let prev = self.indexes.write().insert(field.to_string(), kind);
        if prev.is_none() {
            log::info!("created {kind:?} index on {}.{field}", self.name_str());
        }
    }

    pub fn create_geo_index(&self, field: &str) {
        self.create_index(field, IndexKind::Sphere2d);
    }

    pub fn has_geo_index(&self, field: &str) -> bool {
        matches!(self.indexes.read().get(field), Some(IndexKind::Sphere2d))
    }
}
