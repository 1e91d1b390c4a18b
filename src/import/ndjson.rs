use crate::collection::Collection;
use crate::document::Document;
use crate::engine::Engine;
use crate::errors::DbError;
use crate::utils::json::object_to_bson;
use bson::oid::ObjectId;
use bson::{Bson, Document as BsonDocument};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use super::options::{ImportOptions, ImportReport};

/// Loads `path` into the collection named by `opts.collection`, creating it if needed.
/// A `.json` file is read as one array of records.
///
/// # Errors
/// Returns an error if the file cannot be opened or a record fails while `skip_errors` is off.
pub fn import_file(engine: &Engine, path: &Path, opts: &ImportOptions) -> Result<ImportReport, DbError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DbError::Io(format!("cannot open {}: {e}", path.display())))?;
    let collection = engine.create_collection(&opts.collection);
    let mut report = ImportReport::default();
    if !opts.array_mode && path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        let opts = ImportOptions { array_mode: true, ..opts.clone() };
        import_ndjson(&collection, file, &opts, &mut report)?;
    } else {
        import_ndjson(&collection, file, opts, &mut report)?;
    }
    Ok(report)
}

/// # Errors
/// Returns an error on read failures, or on the first bad record unless `skip_errors` is set.
pub fn import_ndjson<R: Read>(
    collection: &Arc<Collection>,
    reader: R,
    opts: &ImportOptions,
    report: &mut ImportReport,
) -> Result<(), DbError> {
    let mut reader = BufReader::new(reader);
    if opts.array_mode {
        let mut s = String::new();
        reader.read_to_string(&mut s)?;
        let val: serde_json::Value = serde_json::from_str(&s)?;
        let arr = val
            .as_array()
            .ok_or_else(|| DbError::QueryError("expected JSON array".into()))?;
        for v in arr {
            let outcome = record_to_document(v, opts).map(|d| collection.insert_document(d));
            tally(outcome, 0, opts, report)?;
        }
        return Ok(());
    }
    let mut line_no: usize = 0;
    let mut buf = String::with_capacity(8 * 1024);
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let outcome = serde_json::from_str::<serde_json::Value>(line)
            .map_err(DbError::from)
            .and_then(|v| record_to_document(&v, opts))
            .map(|d| collection.insert_document(d));
        tally(outcome, line_no, opts, report)?;
        if let Some(every) = opts.progress_every
            && every > 0
            && line_no % every == 0
        {
            log::info!("imported {} records into {}", report.inserted, collection.name_str());
        }
    }
    Ok(())
}

fn tally<T>(
    outcome: Result<T, DbError>,
    line_no: usize,
    opts: &ImportOptions,
    report: &mut ImportReport,
) -> Result<(), DbError> {
    match outcome {
        Ok(_) => {
            report.inserted += 1;
            Ok(())
        }
        Err(e) if opts.skip_errors => {
            log::warn!("skipping record at line {line_no}: {e}");
            report.skipped += 1;
            report.errors.push((line_no, e.to_string()));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn record_to_document(v: &serde_json::Value, opts: &ImportOptions) -> Result<Document, DbError> {
    let mut bdoc: BsonDocument = object_to_bson(v)?;
    coerce_object_ids(&mut bdoc, &opts.object_id_fields);
    Document::from_bson(bdoc)
}

fn coerce_object_ids(doc: &mut BsonDocument, fields: &[String]) {
    for field in fields {
        let parsed = match doc.get(field) {
            Some(Bson::String(s)) => ObjectId::parse_str(s).ok(),
            _ => None,
        };
        if let Some(oid) = parsed {
            doc.insert(field.clone(), Bson::ObjectId(oid));
        }
    }
}
