use crate::collection::Collection;
use crate::document::Document;
use crate::errors::DbError;
use crate::types::DocumentId;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cursor::Cursor;
use super::eval::{compare_docs, eval_filter, near_distance, project_fields};
use super::telemetry;
use super::types::{Filter, FindOptions, MAX_PROJECTION_FIELDS, MAX_SORT_FIELDS};

/// Runs `filter` over the collection and returns the `skip`/`limit` window.
///
/// With a `$near` clause, results come nearest first; equal distances keep insertion
/// order. An explicit `sort` replaces that order.
///
/// # Errors
/// - `QueryError` for a negative skip, a `$near` on a field without a geo index, or an
///   exceeded `timeout_ms`.
pub fn find_docs(col: &Arc<Collection>, filter: &Filter, opts: &FindOptions) -> Result<Cursor, DbError> {
    let result = run_find(col, filter, opts);
    if let Err(e) = &result {
        telemetry::log_query_error(&col.name_str(), e);
    }
    result
}

fn run_find(col: &Arc<Collection>, filter: &Filter, opts: &FindOptions) -> Result<Cursor, DbError> {
    let bench_start = Instant::now();
    let deadline = opts.timeout_ms.map(|ms| bench_start + Duration::from_millis(ms));
    let skip = resolve_skip(opts.skip)?;
    let cap = telemetry::max_result_limit_for(&col.name_str());
    let requested = resolve_limit(opts.limit).unwrap_or(usize::MAX);
    let limit = requested.min(cap);

    let near = filter.near();
    if let Some(n) = near
        && !col.has_geo_index(&n.path)
    {
        return Err(DbError::QueryError(format!(
            "unable to find index for $geoNear query on field '{}'",
            n.path
        )));
    }

    let mut hits: Vec<(Document, Option<f64>)> = Vec::new();
    for doc in col.get_all_documents() {
        if let Some(dl) = deadline
            && Instant::now() >= dl
        {
            return Err(DbError::QueryError("timeout".into()));
        }
        if !eval_filter(&doc.data, filter) {
            continue;
        }
        let dist = near.and_then(|n| near_distance(&doc.data, n));
        hits.push((doc, dist));
    }

    if let Some(sort) = &opts.sort {
        if sort.len() > MAX_SORT_FIELDS {
            log::warn!("sort spec too long: {}", sort.len());
        }
        hits.sort_by(|a, b| compare_docs(&a.0.data, &b.0.data, sort));
    } else if near.is_some() {
        // Stable: ties keep insertion order.
        hits.sort_by(|a, b| a.1.unwrap_or(f64::MAX).total_cmp(&b.1.unwrap_or(f64::MAX)));
    }

    if cap < requested && hits.len().saturating_sub(skip) > cap {
        log::warn!("result window on '{}' capped at {cap} documents", col.name_str());
        crate::dev6!("{{\"event\":\"result_capped\",\"collection\":\"{}\",\"cap\":{}}}", col.name_str(), cap);
    }

    let mut docs: Vec<Document> = hits.into_iter().skip(skip).take(limit).map(|(d, _)| d).collect();

    if let Some(fields) = &opts.projection {
        let fields: Vec<String> = fields.iter().take(MAX_PROJECTION_FIELDS).cloned().collect();
        for d in &mut docs {
            d.data = project_fields(&d.data, &fields);
        }
    }

    let dur_ms = bench_start.elapsed().as_millis();
    crate::dev6!(
        "{{\"bench\":\"query\",\"op\":\"find\",\"collection\":\"{}\",\"duration_ms\":{},\"near\":{},\"result_count\":{},\"limit\":{},\"skip\":{}}}",
        col.name_str(),
        crate::utils::num::u128_to_u64_saturating(dur_ms),
        near.is_some(),
        crate::utils::num::usize_to_u64(docs.len()),
        opts.limit.unwrap_or(0),
        opts.skip.unwrap_or(0)
    );
    telemetry::log_query(&col.name_str(), &format!("{filter:?}"), dur_ms, opts.limit, opts.skip, docs.len());
    Ok(Cursor { docs, pos: 0 })
}

fn resolve_skip(skip: Option<i64>) -> Result<usize, DbError> {
    match skip {
        None => Ok(0),
        Some(s) if s < 0 => {
            Err(DbError::QueryError(format!("skip value must be non-negative, but received: {s}")))
        }
        Some(s) => Ok(crate::utils::num::i64_to_usize(s).unwrap_or(usize::MAX)),
    }
}

/// `None` means unbounded: absent, zero, or (after taking the absolute value) too large.
fn resolve_limit(limit: Option<i64>) -> Option<usize> {
    match limit? {
        0 => None,
        l => crate::utils::num::i64_to_usize(l.saturating_abs()),
    }
}

#[must_use]
pub fn count_docs(col: &Arc<Collection>, filter: &Filter) -> usize {
    let start = Instant::now();
    let n = col.get_all_documents().iter().filter(|d| eval_filter(&d.data, filter)).count();
    crate::dev6!(
        "{{\"bench\":\"query\",\"op\":\"count\",\"collection\":\"{}\",\"duration_ms\":{},\"result_count\":{}}}",
        col.name_str(),
        crate::utils::num::u128_to_u64_saturating(start.elapsed().as_millis()),
        crate::utils::num::usize_to_u64(n)
    );
    n
}

#[must_use]
pub fn find_by_id(col: &Arc<Collection>, id: &DocumentId) -> Option<Document> {
    let found = col.find_document(id);
    telemetry::log_lookup(&col.name_str(), found.is_some());
    found
}
