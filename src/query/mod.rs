//! In-process evaluation of MongoDB-style query documents, including `$near`.

pub mod geo;
pub mod telemetry;

mod cursor;
mod eval;
mod exec;
mod parse;
mod types;

pub use cursor::Cursor;
pub use eval::{eval_filter, near_distance};
pub use exec::{count_docs, find_by_id, find_docs};
pub use geo::GeoPoint;
pub use parse::{parse_filter_doc, parse_filter_json};
pub use types::{CmpOp, Filter, FindOptions, NearSpec, Order, SortSpec};
