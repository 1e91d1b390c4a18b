//! JSON <-> BSON conversion at the edges: import records, CLI filters and output.

use crate::errors::DbError;
use bson::{Bson, Document as BsonDocument};
use serde_json::Value;

/// Converts a JSON object into a BSON document. Extended JSON such as
/// `{"$oid": "..."}` or `{"$date": "..."}` is understood.
///
/// # Errors
/// Returns `DbError::Bson` if `val` is not an object or holds malformed extended JSON.
pub fn object_to_bson(val: &Value) -> Result<BsonDocument, DbError> {
    let Some(obj) = val.as_object() else {
        return Err(DbError::Bson(format!("expected a JSON object, got {}", kind_of(val))));
    };
    BsonDocument::try_from(obj.clone()).map_err(|e| DbError::Bson(e.to_string()))
}

/// Parses a JSON string whose top level must be an object.
///
/// # Errors
/// `DbError::Json` for invalid JSON, otherwise as [`object_to_bson`].
pub fn parse_object(json: &str) -> Result<BsonDocument, DbError> {
    let val: Value = serde_json::from_str(json)?;
    object_to_bson(&val)
}

/// Relaxed extended JSON view of a document (ObjectIds stay `{"$oid": ...}`).
#[must_use]
pub fn bson_to_json(doc: &BsonDocument) -> Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

fn kind_of(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
