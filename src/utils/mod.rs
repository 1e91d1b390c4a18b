//! Utility modules: developer logging, logger setup, JSON helpers, numeric conversions.
pub mod devlog;
pub mod json;
pub mod logger;
pub mod num;
