//! Application settings.
//!
//! Precedence: CLI > env (`ADOPTLITE_*`) > config file > defaults. The config file is the
//! first of `--config`, `ADOPTLITE_CONFIG` and `./adoptlite.toml` that exists.

use crate::adopt::ADOPT_COLLECTION;
use crate::engine::EngineOptions;
use crate::errors::DbError;
use crate::query::telemetry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "adoptlite.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// NDJSON/JSON files loaded into the listing collection at startup.
    pub data_files: Vec<PathBuf>,
    pub collection: Option<String>,
    /// Upper bound on results returned by a single find.
    pub max_limit: Option<usize>,
    pub slow_query_ms: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_retention: Option<usize>,
    pub dev6: Option<bool>,
}

impl AppConfig {
    /// # Errors
    /// Returns `DbError::Config` for invalid TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, DbError> {
        toml::from_str(s).map_err(|e| DbError::Config(e.to_string()))
    }

    /// # Errors
    /// Returns `DbError::Io` if the file cannot be read, otherwise as [`AppConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DbError::Io(format!("config {}: {e}", path.display())))?;
        Self::from_toml_str(&text).map_err(|e| DbError::Config(format!("{}: {e}", path.display())))
    }

    /// Reads `ADOPTLITE_*` values through `var`. Unparsable numbers are ignored.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_files: var("ADOPTLITE_DATA_FILES")
                .map(|s| s.split(',').filter(|p| !p.trim().is_empty()).map(|p| PathBuf::from(p.trim())).collect())
                .unwrap_or_default(),
            collection: var("ADOPTLITE_COLLECTION"),
            max_limit: var("ADOPTLITE_MAX_LIMIT").and_then(|s| s.parse().ok()),
            slow_query_ms: var("ADOPTLITE_SLOW_QUERY_MS").and_then(|s| s.parse().ok()),
            log_dir: var("ADOPTLITE_LOG_DIR").map(PathBuf::from),
            log_level: var("ADOPTLITE_LOG_LEVEL"),
            log_retention: var("ADOPTLITE_LOG_RETENTION").and_then(|s| s.parse().ok()),
            dev6: var("ADOPTLITE_DEV6").map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|k| std::env::var(k).ok())
    }

    /// Fields set in `top` replace ours.
    #[must_use]
    pub fn overlay(mut self, top: Self) -> Self {
        if !top.data_files.is_empty() {
            self.data_files = top.data_files;
        }
        self.collection = top.collection.or(self.collection);
        self.max_limit = top.max_limit.or(self.max_limit);
        self.slow_query_ms = top.slow_query_ms.or(self.slow_query_ms);
        self.log_dir = top.log_dir.or(self.log_dir);
        self.log_level = top.log_level.or(self.log_level);
        self.log_retention = top.log_retention.or(self.log_retention);
        self.dev6 = top.dev6.or(self.dev6);
        self
    }

    #[must_use]
    pub fn collection_name(&self) -> &str {
        self.collection.as_deref().unwrap_or(ADOPT_COLLECTION)
    }

    /// Seeds every data file into the listing collection, which gets a `location` geo index.
    #[must_use]
    pub fn engine_options(&self) -> EngineOptions {
        let col = self.collection_name().to_string();
        EngineOptions {
            seed_files: self.data_files.iter().map(|p| (col.clone(), p.clone())).collect(),
            geo_indexes: vec![(col, "location".to_string())],
        }
    }

    /// Pushes the query limits into telemetry.
    pub fn apply_query_limits(&self) {
        if let Some(ms) = self.slow_query_ms {
            telemetry::set_slow_query_ms(ms);
        }
        if let Some(max) = self.max_limit {
            telemetry::set_max_result_limit_global(max);
        }
    }

    /// # Errors
    /// Same as [`crate::utils::logger::configure_logging`].
    pub fn init_logging(&self) -> Result<(), DbError> {
        crate::utils::logger::configure_logging(
            self.log_dir.as_deref(),
            self.log_level.as_deref(),
            self.log_retention,
            self.dev6.unwrap_or(false),
        )
    }
}

/// Picks the config file: an explicit path must exist; otherwise the first existing
/// candidate, if any.
///
/// # Errors
/// Returns `DbError::Config` if `explicit` is given but missing.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, DbError> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(DbError::Config(format!("config file not found: {}", p.display())));
        }
        return Ok(Some(p.to_path_buf()));
    }
    let mut candidates = Vec::new();
    if let Ok(p) = std::env::var("ADOPTLITE_CONFIG") {
        candidates.push(PathBuf::from(p));
    }
    if let Ok(cur) = std::env::current_dir() {
        candidates.push(cur.join(DEFAULT_CONFIG_FILE));
    }
    Ok(candidates.into_iter().find(|p| p.exists()))
}

/// Resolves the full configuration for a run.
///
/// # Errors
/// Any failure locating or parsing the config file.
pub fn load(explicit: Option<&Path>, cli: AppConfig) -> Result<AppConfig, DbError> {
    let file = match find_config_file(explicit)? {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::default(),
    };
    Ok(file.overlay(AppConfig::from_env()).overlay(cli))
}
