use serde::Serialize;

/// A non-fatal notice raised while collecting tokens from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    Invalid { line: u64, token: String },
    Duplicate { token: String, count: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub lines_read: u64,
    pub valid_lines: u64,
    pub invalid_lines: u64,
    pub unique_tokens: u64,
    pub duplicate_tokens: u64,
    pub rows_inserted: u64,
    pub rows_already_present: u64,
    pub batches_flushed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunReport {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub input: String,
    pub batch_size: usize,
    pub counts: ImportCounts,
    pub diagnostics: Vec<Diagnostic>,
}
