use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::MAX_LIMIT;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub slow_query_ms: u64,
    pub max_result_limit: usize,
    pub per_collection_max: HashMap<String, usize>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let slow = std::env::var("ADOPTLITE_SLOW_QUERY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(500);
        Self { slow_query_ms: slow, max_result_limit: MAX_LIMIT, per_collection_max: HashMap::new() }
    }
}

#[derive(Default)]
pub struct Metrics {
    pub queries_total: AtomicU64,
    pub queries_slow_total: AtomicU64,
    pub queries_failed_total: AtomicU64,
    pub lookups_total: AtomicU64,
}

#[derive(Default)]
pub struct Telemetry {
    pub cfg: RwLock<TelemetryConfig>,
    pub metrics: Metrics,
}

pub(crate) static TELEMETRY: std::sync::LazyLock<Telemetry> =
    std::sync::LazyLock::new(Telemetry::default);

pub fn set_slow_query_ms(ms: u64) {
    TELEMETRY.cfg.write().slow_query_ms = ms;
}

fn sha256_hex(input: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut h = Sha256::new();
    h.update(input.as_bytes());
    hex::encode(h.finalize())
}

/// Records one executed find. The filter itself is never logged, only its hash.
pub fn log_query(
    collection: &str,
    filter_dbg: &str,
    duration_ms: u128,
    limit: Option<i64>,
    skip: Option<i64>,
    result_count: usize,
) {
    TELEMETRY.metrics.queries_total.fetch_add(1, Ordering::Relaxed);
    let slow_ms = TELEMETRY.cfg.read().slow_query_ms;
    let slow = u64::try_from(duration_ms).map_or(true, |ms| ms >= slow_ms);
    if slow {
        TELEMETRY.metrics.queries_slow_total.fetch_add(1, Ordering::Relaxed);
    }
    let filter_hash = sha256_hex(filter_dbg);
    let line = serde_json::json!({
        "collection": collection,
        "filter_hash": &filter_hash[..16],
        "duration_ms": u64::try_from(duration_ms).unwrap_or(u64::MAX),
        "limit": limit,
        "skip": skip,
        "result_count": result_count,
        "slow": slow
    });
    if slow {
        log::warn!(target: "adoptlite::metrics", "slow query {line}");
    } else {
        log::info!(target: "adoptlite::metrics", "{line}");
    }
}

pub fn log_query_error(collection: &str, err: &crate::errors::DbError) {
    TELEMETRY.metrics.queries_failed_total.fetch_add(1, Ordering::Relaxed);
    log::warn!(target: "adoptlite::metrics", "query on {collection} failed: {err}");
}

pub fn log_lookup(collection: &str, found: bool) {
    TELEMETRY.metrics.lookups_total.fetch_add(1, Ordering::Relaxed);
    log::debug!(target: "adoptlite::metrics", "lookup on {collection} found={found}");
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    let m = &TELEMETRY.metrics;
    format!(
        "adoptlite_queries_total {}\n\
         adoptlite_queries_slow_total {}\n\
         adoptlite_queries_failed_total {}\n\
         adoptlite_lookups_total {}\n",
        m.queries_total.load(Ordering::Relaxed),
        m.queries_slow_total.load(Ordering::Relaxed),
        m.queries_failed_total.load(Ordering::Relaxed),
        m.lookups_total.load(Ordering::Relaxed),
    )
}

pub fn max_result_limit() -> usize {
    TELEMETRY.cfg.read().max_result_limit
}

pub fn set_max_result_limit_global(limit: usize) {
    TELEMETRY.cfg.write().max_result_limit = limit;
}

pub fn set_max_result_limit_for(collection: &str, limit: usize) {
    TELEMETRY.cfg.write().per_collection_max.insert(collection.to_string(), limit);
}

pub fn max_result_limit_for(collection: &str) -> usize {
    let cfg = TELEMETRY.cfg.read();
    cfg.per_collection_max.get(collection).copied().unwrap_or(cfg.max_result_limit)
}
