use crate::errors::DbError;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CollectionName = String;

/// A wrapper around `bson::oid::ObjectId` so ids hash and order like plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub ObjectId);

impl DocumentId {
    #[must_use]
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses a 24-character hex string.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDocumentId` when the input is not a valid ObjectId.
    pub fn parse(s: &str) -> Result<Self, DbError> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|e| DbError::InvalidDocumentId(format!("{s}: {e}")))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}
