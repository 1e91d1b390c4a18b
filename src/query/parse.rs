use crate::errors::DbError;
use bson::{Bson, Document as BsonDocument};

use super::geo::{GeoPoint, bson_number};
use super::types::{CmpOp, Filter, MAX_IN_SET, NearSpec};

/// Parses a MongoDB-style query document into a `Filter`.
///
/// Supported: implicit equality, `$eq $ne $gt $gte $lt $lte $in $nin $exists $not $near
/// $nearSphere` on fields, and `$and $or $nor` at the top level of any (sub)query.
///
/// # Errors
/// Returns `DbError::QueryError` for unknown operators or malformed operands and
/// `DbError::InvalidGeometry` for unusable `$near` parameters.
pub fn parse_filter_doc(query: &BsonDocument) -> Result<Filter, DbError> {
    let filter = parse_conjunction(query)?;
    if filter.count_near() > 1 {
        return Err(DbError::QueryError("too many geoNear expressions".into()));
    }
    if filter.count_near() > 0 && filter.near().is_none() {
        return Err(DbError::QueryError("$near is not allowed inside $or, $nor or $not".into()));
    }
    Ok(filter)
}

/// Parses a JSON filter (extended JSON allowed, e.g. `{"$oid": "..."}`).
///
/// # Errors
/// Returns an error if the JSON string is not an object or is not a valid query.
pub fn parse_filter_json(json: &str) -> Result<Filter, DbError> {
    let doc = crate::utils::json::parse_object(json)?;
    parse_filter_doc(&doc)
}

fn parse_conjunction(query: &BsonDocument) -> Result<Filter, DbError> {
    let mut parts = Vec::with_capacity(query.len());
    for (key, value) in query {
        match key.as_str() {
            "$and" => parts.push(Filter::And(parse_clause_list(key, value)?)),
            "$or" => parts.push(Filter::Or(parse_clause_list(key, value)?)),
            "$nor" => parts.push(Filter::Not(Box::new(Filter::Or(parse_clause_list(key, value)?)))),
            k if k.starts_with('$') => {
                return Err(DbError::QueryError(format!("unknown top level operator: {k}")));
            }
            path => parts.push(parse_field(path, value)?),
        }
    }
    Ok(match parts.len() {
        0 => Filter::True,
        1 => parts.remove(0),
        _ => Filter::And(parts),
    })
}

fn parse_clause_list(op: &str, value: &Bson) -> Result<Vec<Filter>, DbError> {
    let Bson::Array(items) = value else {
        return Err(DbError::QueryError(format!("{op} must be an array")));
    };
    if items.is_empty() {
        return Err(DbError::QueryError(format!("{op} must be a nonempty array")));
    }
    items
        .iter()
        .map(|item| match item {
            Bson::Document(d) => parse_conjunction(d),
            other => Err(DbError::QueryError(format!("{op} entries must be objects, got {other}"))),
        })
        .collect()
}

fn is_operator_doc(value: &Bson) -> Option<&BsonDocument> {
    match value {
        Bson::Document(d) if d.keys().next().is_some_and(|k| k.starts_with('$')) => Some(d),
        _ => None,
    }
}

fn parse_field(path: &str, value: &Bson) -> Result<Filter, DbError> {
    let Some(ops) = is_operator_doc(value) else {
        return Ok(Filter::Cmp { path: path.to_string(), op: CmpOp::Eq, value: value.clone() });
    };
    let mut parts = Vec::with_capacity(ops.len());
    for (op, operand) in ops {
        let f = match op.as_str() {
            "$eq" => cmp(path, CmpOp::Eq, operand),
            "$ne" => cmp(path, CmpOp::Ne, operand),
            "$gt" => cmp(path, CmpOp::Gt, operand),
            "$gte" => cmp(path, CmpOp::Gte, operand),
            "$lt" => cmp(path, CmpOp::Lt, operand),
            "$lte" => cmp(path, CmpOp::Lte, operand),
            "$in" => Filter::In { path: path.to_string(), values: set_operand(op, operand)? },
            "$nin" => Filter::Nin { path: path.to_string(), values: set_operand(op, operand)? },
            "$exists" => Filter::Exists { path: path.to_string(), exists: truthy(operand) },
            "$not" => match is_operator_doc(operand) {
                Some(_) => Filter::Not(Box::new(parse_field(path, operand)?)),
                None => return Err(DbError::QueryError("$not needs an operator object".into())),
            },
            "$near" | "$nearSphere" => Filter::Near(parse_near(path, operand, ops)?),
            // Legacy siblings of `$near`, consumed by `parse_near`.
            "$maxDistance" | "$minDistance" if ops.contains_key("$near") || ops.contains_key("$nearSphere") => {
                continue;
            }
            other => return Err(DbError::QueryError(format!("unknown operator: {other}"))),
        };
        parts.push(f);
    }
    Ok(if parts.len() == 1 { parts.remove(0) } else { Filter::And(parts) })
}

fn cmp(path: &str, op: CmpOp, value: &Bson) -> Filter {
    Filter::Cmp { path: path.to_string(), op, value: value.clone() }
}

fn set_operand(op: &str, operand: &Bson) -> Result<Vec<Bson>, DbError> {
    match operand {
        Bson::Array(vals) => Ok(vals.iter().take(MAX_IN_SET).cloned().collect()),
        other => Err(DbError::QueryError(format!("{op} needs an array, got {other}"))),
    }
}

fn truthy(v: &Bson) -> bool {
    match v {
        Bson::Boolean(b) => *b,
        Bson::Null | Bson::Undefined => false,
        other => bson_number(other).is_none_or(|n| n != 0.0),
    }
}

/// Accepts `{$near: {$geometry: <Point>, $maxDistance, $minDistance}}` as well as the
/// legacy `{$near: [lng, lat], $maxDistance: m}` form.
fn parse_near(path: &str, operand: &Bson, siblings: &BsonDocument) -> Result<NearSpec, DbError> {
    let (center, params) = match operand {
        Bson::Document(d) => {
            let geometry = match d.get("$geometry") {
                Some(Bson::Document(g)) => g,
                Some(other) => {
                    return Err(DbError::InvalidGeometry(format!("$geometry must be an object, got {other}")));
                }
                None => return Err(DbError::InvalidGeometry("$near requires $geometry".into())),
            };
            (GeoPoint::from_geojson(geometry)?, d)
        }
        Bson::Array(_) => (GeoPoint::from_coordinates(operand)?, siblings),
        other => return Err(DbError::InvalidGeometry(format!("malformed $near: {other}"))),
    };
    let max_distance = distance_param(params, "$maxDistance")?;
    let min_distance = distance_param(params, "$minDistance")?;
    Ok(NearSpec { path: path.to_string(), center, max_distance, min_distance })
}

fn distance_param(params: &BsonDocument, key: &str) -> Result<Option<f64>, DbError> {
    let Some(v) = params.get(key) else {
        return Ok(None);
    };
    match bson_number(v) {
        Some(m) if m.is_finite() && m >= 0.0 => Ok(Some(m)),
        Some(m) => Err(DbError::InvalidGeometry(format!("{key} must be non-negative, got {m}"))),
        None => Err(DbError::InvalidGeometry(format!("{key} must be a number, got {v}"))),
    }
}
