mod ndjson;
mod options;

pub use ndjson::{import_file, import_ndjson};
pub use options::{ImportOptions, ImportReport};
