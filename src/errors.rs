use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),

    #[error("Collection not found: {0}")]
    NoSuchCollection(String),

    #[error("Collection already exists: {0}")]
    CollectionAlreadyExists(String),

    #[error("Invalid document ID: {0}")]
    InvalidDocumentId(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("unauthenticated")]
    Unauthenticated,
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

