//! Mapping-table driven translation of filter arguments into query documents.
//!
//! A [`FilterMapping`] lists the filter fields a resolver understands and how each one
//! becomes a query condition. [`build_conditions_from_filters`] walks a filter document,
//! looks every key up in the table and assembles the resulting conditions.
//!
//! Keys may carry an operator suffix (`age_gte`, `name_in`, ...). The suffix is stripped
//! to find the mapping entry and, for one-to-one matches, turned into the matching query
//! operator: `{age_gte: 2}` becomes `{age: {$gte: 2}}`. A key that names a mapping entry
//! exactly is never split. `OR` and `AND` take lists of nested filters.

use crate::errors::DbError;
use bson::{Bson, Document as BsonDocument};

const SUFFIX_OPERATORS: [&str; 7] = ["gt", "gte", "lt", "lte", "ne", "in", "nin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterConditionType {
    /// The filter value is matched against the field as-is (or through its operator suffix).
    MatchOneToOne,
    /// The entry's format function builds the condition; `None` contributes nothing.
    CustomCondition,
}

pub type ConditionFormat<C> = Box<dyn Fn(&Bson, &C) -> Option<BsonDocument> + Send + Sync>;
pub type ValueFormat<C> = Box<dyn Fn(&Bson, &C) -> Bson + Send + Sync>;

pub struct FieldMapping<C> {
    pub kind: FilterConditionType,
    /// Document field to match, when it differs from the filter field.
    pub key: Option<String>,
    pub(crate) condition: Option<ConditionFormat<C>>,
    pub(crate) value: Option<ValueFormat<C>>,
}

impl<C> FieldMapping<C> {
    #[must_use]
    pub fn one_to_one() -> Self {
        Self { kind: FilterConditionType::MatchOneToOne, key: None, condition: None, value: None }
    }

    pub fn custom(format: impl Fn(&Bson, &C) -> Option<BsonDocument> + Send + Sync + 'static) -> Self {
        Self {
            kind: FilterConditionType::CustomCondition,
            key: None,
            condition: Some(Box::new(format)),
            value: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Transforms the value of a one-to-one match before it is placed in the query.
    #[must_use]
    pub fn with_value_format(mut self, f: impl Fn(&Bson, &C) -> Bson + Send + Sync + 'static) -> Self {
        self.value = Some(Box::new(f));
        self
    }
}

impl<C> std::fmt::Debug for FieldMapping<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMapping").field("kind", &self.kind).field("key", &self.key).finish()
    }
}

/// Ordered table of filter field -> mapping.
pub struct FilterMapping<C> {
    entries: Vec<(String, FieldMapping<C>)>,
}

impl<C> Default for FilterMapping<C> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<C> FilterMapping<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &str, mapping: FieldMapping<C>) -> Self {
        self.entries.retain(|(n, _)| n != name);
        self.entries.push((name.to_string(), mapping));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldMapping<C>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Finds the entry for a filter key: an exact match first, then `<field>_<op>`.
    fn resolve<'a>(&'a self, key: &'a str) -> Option<(&'a str, &'a FieldMapping<C>, Option<&'a str>)> {
        if let Some(m) = self.get(key) {
            return Some((key, m, None));
        }
        let (field, op) = key.rsplit_once('_')?;
        if !SUFFIX_OPERATORS.contains(&op) {
            return None;
        }
        self.get(field).map(|m| (field, m, Some(op)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    pub conditions: BsonDocument,
}

/// Builds query conditions from `filters` using `mapping`.
///
/// Unmapped keys and `null` values are ignored.
///
/// # Errors
/// Returns `DbError::QueryError` if `OR`/`AND` do not hold lists of objects.
pub fn build_conditions_from_filters<C>(
    ctx: &C,
    filters: &BsonDocument,
    mapping: &FilterMapping<C>,
) -> Result<FilterResult, DbError> {
    let mut conditions = BsonDocument::new();
    for (key, value) in filters {
        if matches!(value, Bson::Null | Bson::Undefined) {
            continue;
        }
        if key == "OR" || key == "AND" {
            let nested = nested_conditions(ctx, key, value, mapping)?;
            if !nested.is_empty() {
                let op = if key == "OR" { "$or" } else { "$and" };
                conditions.insert(op, Bson::Array(nested.into_iter().map(Bson::Document).collect()));
            }
            continue;
        }
        let Some((field, entry, op)) = mapping.resolve(key) else {
            log::trace!("filter key {key} has no mapping; ignored");
            continue;
        };
        match entry.kind {
            FilterConditionType::CustomCondition => {
                let built = entry.condition.as_ref().and_then(|format| format(value, ctx));
                if let Some(extra) = built {
                    for (k, v) in extra {
                        conditions.insert(k, v);
                    }
                }
            }
            FilterConditionType::MatchOneToOne => {
                let target = entry.key.as_deref().unwrap_or(field);
                let v = entry.value.as_ref().map_or_else(|| value.clone(), |f| f(value, ctx));
                match op {
                    None => {
                        conditions.insert(target, v);
                    }
                    Some(op) => merge_operator(&mut conditions, target, op, v),
                }
            }
        }
    }
    Ok(FilterResult { conditions })
}

fn nested_conditions<C>(
    ctx: &C,
    key: &str,
    value: &Bson,
    mapping: &FilterMapping<C>,
) -> Result<Vec<BsonDocument>, DbError> {
    let Bson::Array(items) = value else {
        return Err(DbError::QueryError(format!("{key} must be a list of filters")));
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Bson::Document(sub) = item else {
            return Err(DbError::QueryError(format!("{key} entries must be objects")));
        };
        let built = build_conditions_from_filters(ctx, sub, mapping)?.conditions;
        if !built.is_empty() {
            out.push(built);
        }
    }
    Ok(out)
}

fn merge_operator(conditions: &mut BsonDocument, field: &str, op: &str, value: Bson) {
    let key = format!("${op}");
    if let Ok(existing) = conditions.get_document_mut(field) {
        existing.insert(key, value);
        return;
    }
    let mut sub = BsonDocument::new();
    sub.insert(key, value);
    conditions.insert(field, sub);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn mapping() -> FilterMapping<()> {
        FilterMapping::new()
            .field("age", FieldMapping::one_to_one())
            .field("name", FieldMapping::one_to_one().with_key("profile.name"))
            .field(
                "kind",
                FieldMapping::custom(|v, _| match v {
                    Bson::String(s) if s.is_empty() => None,
                    other => Some(doc! {"type": other.clone()}),
                }),
            )
            .field("skip_me", FieldMapping::custom(|_, _| None))
    }

    #[test]
    fn suffix_operators_merge_on_one_field() {
        let res = build_conditions_from_filters(&(), &doc! {"age_gte": 2, "age_lt": 9}, &mapping()).unwrap();
        assert_eq!(res.conditions, doc! {"age": {"$gte": 2, "$lt": 9}});
    }

    #[test]
    fn custom_conditions_and_renames() {
        let res = build_conditions_from_filters(
            &(),
            &doc! {"kind": "dog", "name": "rex", "skip_me": 5, "unknown_gte": 1, "age": null},
            &mapping(),
        )
        .unwrap();
        assert_eq!(res.conditions, doc! {"type": "dog", "profile.name": "rex"});
        let empty = build_conditions_from_filters(&(), &doc! {"kind": ""}, &mapping()).unwrap();
        assert!(empty.conditions.is_empty());
    }

    #[test]
    fn or_and_recurse() {
        let res = build_conditions_from_filters(
            &(),
            &doc! {"OR": [{"kind": "dog"}, {"kind": "cat"}, {"kind": ""}]},
            &mapping(),
        )
        .unwrap();
        assert_eq!(res.conditions, doc! {"$or": [{"type": "dog"}, {"type": "cat"}]});
        assert!(build_conditions_from_filters(&(), &doc! {"AND": 1}, &mapping()).is_err());
    }

    #[test]
    fn unknown_suffix_is_not_split() {
        let res = build_conditions_from_filters(&(), &doc! {"age_between": 3}, &mapping()).unwrap();
        assert!(res.conditions.is_empty());
        assert_eq!(mapping().fields().collect::<Vec<_>>(), vec!["age", "name", "kind", "skip_me"]);
    }
    #[test]
    fn value_format_sees_value_and_context() {
        let scaled: FilterMapping<i64> = FilterMapping::new()
            .field(
                "radius",
                FieldMapping::one_to_one().with_key("range_m").with_value_format(|v: &Bson, per_unit: &i64| match v {
                    Bson::Int32(n) => Bson::Int64(i64::from(*n) * per_unit),
                    other => other.clone(),
                }),
            )
            .field("size", FieldMapping::one_to_one().with_value_format(|v, _| match v {
                Bson::String(s) => Bson::String(s.to_uppercase()),
                other => other.clone(),
            }));
        let res = build_conditions_from_filters(&1000, &doc! {"radius_lte": 5, "size": "small"}, &scaled).unwrap();
        assert_eq!(res.conditions, doc! {"range_m": {"$lte": 5000_i64}, "size": "SMALL"});
        let exact = build_conditions_from_filters(&10, &doc! {"radius": 3}, &scaled).unwrap();
        assert_eq!(exact.conditions, doc! {"range_m": 30_i64});
    }
}
