use super::model::AuthUser;
use crate::conditions::{FieldMapping, FilterMapping};
use async_graphql::InputObject;
use bson::{Bson, Document as BsonDocument};
use serde::Deserialize;
use std::sync::LazyLock;

/// Filter arguments of the `adopts` query.
#[derive(InputObject, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "AdoptsFilter")]
#[serde(deny_unknown_fields)]
pub struct AdoptsFilter {
    pub size: Option<String>,
    pub gender: Option<String>,
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Minimum age, inclusive
    #[graphql(name = "age_gte")]
    pub age_gte: Option<i32>,
    /// Search radius in kilometers
    pub distance: Option<i32>,
}

impl AdoptsFilter {
    /// The filter as a document keyed by its schema field names; absent fields are omitted.
    #[must_use]
    pub fn to_document(&self) -> BsonDocument {
        let mut d = BsonDocument::new();
        if let Some(v) = &self.size {
            d.insert("size", v.as_str());
        }
        if let Some(v) = &self.gender {
            d.insert("gender", v.as_str());
        }
        if let Some(v) = &self.kind {
            d.insert("type", v.as_str());
        }
        if let Some(v) = self.age_gte {
            d.insert("age_gte", v);
        }
        if let Some(v) = self.distance {
            d.insert("distance", v);
        }
        d
    }
}

/// Equality on `field` unless the value is an empty string.
fn non_empty_equality(field: &'static str) -> FieldMapping<AuthUser> {
    FieldMapping::custom(move |value, _| match value {
        Bson::String(s) if s.is_empty() => None,
        other => {
            let mut cond = BsonDocument::new();
            cond.insert(field, other.clone());
            Some(cond)
        }
    })
}

static ADOPT_MAPPING: LazyLock<FilterMapping<AuthUser>> = LazyLock::new(|| {
    FilterMapping::new()
        .field("size", non_empty_equality("size"))
        .field("gender", non_empty_equality("gender"))
        .field("type", non_empty_equality("type"))
        .field("age", FieldMapping::one_to_one())
        // Consumed by the proximity clause, never matched directly.
        .field("distance", FieldMapping::custom(|_, _| None))
});

/// Mapping table for `AdoptsFilter`.
#[must_use]
pub fn adopt_mapping() -> &'static FilterMapping<AuthUser> {
    &ADOPT_MAPPING
}
