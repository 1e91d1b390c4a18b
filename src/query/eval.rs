use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::geo::GeoPoint;
use super::types::{CmpOp, Filter, MAX_IN_SET, MAX_PATH_DEPTH, MAX_SORT_FIELDS, NearSpec, SortSpec};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Or(fs) => fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Not(f) => !eval_filter(doc, f),
        Filter::Exists { path, exists } => get_path(doc, path).is_some() == *exists,
        Filter::In { path, values } => get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Nin { path, values } => !get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        // `$ne` also matches documents where the field is missing.
        Filter::Cmp { path, op: CmpOp::Ne, value } => {
            !get_path(doc, path).is_some_and(|v| matches_eq(v, value))
        }
        Filter::Cmp { path, op, value } => get_path(doc, path).is_some_and(|v| match op {
            CmpOp::Eq => matches_eq(v, value),
            _ => any_element(v, |x| ordered_match(x, *op, value)),
        }),
        Filter::Near(near) => near_distance(doc, near).is_some(),
    }
}

/// Distance in meters from the `$near` center to the document's point, when the
/// document has a readable point within the configured bounds.
#[must_use]
pub fn near_distance(doc: &BsonDocument, near: &NearSpec) -> Option<f64> {
    let point = get_path(doc, &near.path).and_then(GeoPoint::from_stored)?;
    let d = near.center.distance_m(&point);
    if near.max_distance.is_some_and(|max| d > max) {
        return None;
    }
    if near.min_distance.is_some_and(|min| d < min) {
        return None;
    }
    Some(d)
}

fn matches_eq(v: &Bson, expected: &Bson) -> bool {
    if bson_equal(v, expected) {
        return true;
    }
    // A scalar operand also matches arrays that contain it.
    match (v, expected) {
        (Bson::Array(items), e) if !matches!(e, Bson::Array(_)) => items.iter().any(|x| bson_equal(x, e)),
        _ => false,
    }
}

fn any_element(v: &Bson, pred: impl Fn(&Bson) -> bool) -> bool {
    match v {
        Bson::Array(items) => items.iter().any(&pred),
        other => pred(other),
    }
}

/// Range comparisons only hold between values of the same type class.
fn ordered_match(v: &Bson, op: CmpOp, bound: &Bson) -> bool {
    if type_class(v) != type_class(bound) {
        return false;
    }
    let c = compare_bson(v, bound);
    match op {
        CmpOp::Gt => c == Ordering::Greater,
        CmpOp::Gte => c != Ordering::Less,
        CmpOp::Lt => c == Ordering::Less,
        CmpOp::Lte => c != Ordering::Greater,
        CmpOp::Eq | CmpOp::Ne => false,
    }
}

fn bson_equal(a: &Bson, b: &Bson) -> bool {
    if is_num(a) && is_num(b) {
        return compare_bson(a, b) == Ordering::Equal;
    }
    a == b
}

pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort.iter().take(MAX_SORT_FIELDS) {
        let va = get_path(a, &s.field);
        let vb = get_path(b, &s.field);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if matches!(s.order, super::types::Order::Asc) { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

fn is_in_set(v: &Bson, set: &[Bson]) -> bool {
    set.iter().take(MAX_IN_SET).any(|x| matches_eq(v, x))
}

/// Resolves a dotted path. Intermediate segments must be sub-documents.
pub(crate) fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let mut parts = path.split('.');
    let mut cur = doc.get(parts.next()?)?;
    for (depth, part) in parts.enumerate() {
        if depth + 1 >= MAX_PATH_DEPTH {
            return None;
        }
        match cur {
            Bson::Document(d) => cur = d.get(part)?,
            _ => return None,
        }
    }
    Some(cur)
}

fn is_num(x: &Bson) -> bool {
    matches!(x, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_))
}

pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    use bson::Bson as T;
    fn as_f64_num(x: &T) -> f64 {
        super::geo::bson_number(x).unwrap_or(f64::NAN)
    }
    if is_num(a) && is_num(b) {
        return as_f64_num(a).total_cmp(&as_f64_num(b));
    }
    match (a, b) {
        (T::String(x), T::String(y)) => x.cmp(y),
        (T::Boolean(x), T::Boolean(y)) => x.cmp(y),
        (T::ObjectId(x), T::ObjectId(y)) => x.cmp(y),
        (T::DateTime(x), T::DateTime(y)) => x.cmp(y),
        _ => type_class(a).cmp(&type_class(b)),
    }
}

/// Cross-type ordering, after MongoDB's comparison order. Numbers share one class.
fn type_class(v: &Bson) -> u8 {
    use bson::Bson as T;
    match v {
        T::MinKey => 0,
        T::Null | T::Undefined => 1,
        T::Int32(_) | T::Int64(_) | T::Double(_) | T::Decimal128(_) => 2,
        T::String(_) | T::Symbol(_) => 3,
        T::Document(_) => 4,
        T::Array(_) => 5,
        T::Binary(_) => 6,
        T::ObjectId(_) => 7,
        T::Boolean(_) => 8,
        T::DateTime(_) => 9,
        T::Timestamp(_) => 10,
        T::RegularExpression(_) => 11,
        T::DbPointer(_) | T::JavaScriptCode(_) | T::JavaScriptCodeWithScope(_) => 12,
        T::MaxKey => 255,
    }
}

pub fn project_fields(doc: &BsonDocument, fields: &[String]) -> BsonDocument {
    let mut out = BsonDocument::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for f in fields {
        if let Some(v) = doc.get(f) {
            out.insert(f.clone(), v.clone());
        }
    }
    out
}
