use crate::document::Document;
use crate::query::GeoPoint;
use crate::types::DocumentId;
use bson::oid::ObjectId;
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// The authenticated user issuing a request, as supplied by the session layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: ObjectId,
    pub location: Option<UserLocation>,
}

/// Stored position of a user. `coordinates` is `[lng, lat]`; it is handed to the
/// query layer untouched, which is where malformed values are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub coordinates: Vec<f64>,
}

impl AuthUser {
    #[must_use]
    pub fn new(id: ObjectId) -> Self {
        Self { id, location: None }
    }

    #[must_use]
    pub fn at(mut self, lng: f64, lat: f64) -> Self {
        self.location = Some(UserLocation { coordinates: vec![lng, lat] });
        self
    }

    pub(crate) fn coordinates_bson(&self) -> Bson {
        self.location.as_ref().map_or(Bson::Null, |l| {
            Bson::Array(l.coordinates.iter().copied().map(Bson::Double).collect())
        })
    }
}

/// One adoption listing as read from the `adopts` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Adopt {
    pub id: DocumentId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub size: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub adopted: bool,
    pub user: Option<ObjectId>,
    pub location: Option<GeoPoint>,
    pub created_at: Option<DateTime<Utc>>,
}

fn string_field(data: &BsonDocument, key: &str) -> Option<String> {
    data.get_str(key).ok().map(str::to_string)
}

#[allow(clippy::cast_possible_truncation)]
fn int_field(data: &BsonDocument, key: &str) -> Option<i64> {
    match data.get(key)? {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        Bson::Double(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

impl Adopt {
    /// Reads the known fields; anything missing or of the wrong type is left empty.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let data = &doc.data;
        Self {
            id: doc.id,
            name: string_field(data, "name"),
            description: string_field(data, "description"),
            kind: string_field(data, "type"),
            size: string_field(data, "size"),
            gender: string_field(data, "gender"),
            age: int_field(data, "age"),
            adopted: data.get_bool("adopted").unwrap_or(false),
            user: data.get_object_id("user").ok(),
            location: data.get("location").and_then(GeoPoint::from_stored),
            created_at: match data.get("created_at") {
                Some(Bson::DateTime(dt)) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()),
                Some(Bson::String(s)) => DateTime::parse_from_rfc3339(s).ok().map(|d| d.with_timezone(&Utc)),
                _ => None,
            },
        }
    }

    /// Plain JSON view used by the CLI.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_hex(),
            "name": self.name,
            "description": self.description,
            "type": self.kind,
            "size": self.size,
            "gender": self.gender,
            "age": self.age,
            "adopted": self.adopted,
            "user": self.user.map(|u| u.to_hex()),
            "location": self.location.map(|p| json!({"type": "Point", "coordinates": [p.lng, p.lat]})),
            "created_at": self.created_at.map(|t| t.to_rfc3339()),
        })
    }
}
