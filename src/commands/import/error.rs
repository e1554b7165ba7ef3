use thiserror::Error;

pub(super) type ImportResult<T> = Result<T, ImportError>;

/// Fatal import failures, named after the phase that failed.
#[derive(Debug, Error)]
pub(super) enum ImportError {
    #[error("batch size must be between 1 and {max}, got {got}")]
    InvalidBatchSize { got: usize, max: usize },
    #[error("could not open database")]
    Open(#[source] rusqlite::Error),
    #[error("could not ping database")]
    Ping(#[source] rusqlite::Error),
    #[error("could not begin transaction")]
    Begin(#[source] rusqlite::Error),
    #[error("could not create/ensure table")]
    Schema(#[source] rusqlite::Error),
    #[error("could not read tokens at line {line}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("batch already holds {capacity} tokens")]
    BatchFull { capacity: usize },
    #[error("could not execute batch {batch}")]
    Flush {
        batch: u64,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not commit transaction")]
    Commit(#[source] rusqlite::Error),
    #[error("import cancelled")]
    Cancelled,
}

impl From<BatchFull> for ImportError {
    fn from(err: BatchFull) -> Self {
        ImportError::BatchFull {
            capacity: err.capacity,
        }
    }
}

/// Returned by `InsertTokensBatch::add_token` when the caller skipped a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("batch is full ({capacity} tokens)")]
pub(super) struct BatchFull {
    pub(super) capacity: usize,
}
