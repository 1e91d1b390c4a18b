#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub collection: String,
    /// Treat the whole input as one JSON array instead of one object per line.
    pub array_mode: bool,
    pub skip_errors: bool,
    /// Fields whose 24-char hex string values are stored as ObjectIds.
    pub object_id_fields: Vec<String>,
    pub progress_every: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            collection: "adopts".to_string(),
            array_mode: false,
            skip_errors: true,
            object_id_fields: vec!["_id".to_string(), "user".to_string()],
            progress_every: Some(1000),
        }
    }
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: u64,
    /// `(line, message)` for each skipped record; line is 0 in array mode.
    pub errors: Vec<(usize, String)>,
}
