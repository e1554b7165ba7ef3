use super::*;

const INSERT_PREFIX: &str = "INSERT INTO tokens (token) VALUES ";
const INSERT_SUFFIX: &str = " ON CONFLICT DO NOTHING";

pub(super) fn validate_batch_size(batch_size: usize) -> ImportResult<()> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(ImportError::InvalidBatchSize {
            got: batch_size,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}

/// Accumulates up to `capacity` tokens into one multi-row insert.
///
/// Placeholders are numbered in insertion order, one per token, so `values[i]`
/// binds to `?{i + 1}`. A successful flush resets the builder for reuse.
#[derive(Debug)]
pub(super) struct InsertTokensBatch {
    sql: String,
    values: Vec<String>,
    capacity: usize,
    batches_flushed: u64,
}

impl InsertTokensBatch {
    pub(super) fn new(capacity: usize) -> ImportResult<Self> {
        validate_batch_size(capacity)?;

        let mut batch = Self {
            sql: String::new(),
            values: Vec::with_capacity(capacity),
            capacity,
            batches_flushed: 0,
        };
        batch.reset();
        Ok(batch)
    }

    pub(super) fn add_token(&mut self, token: &str) -> Result<(), BatchFull> {
        if self.is_full() {
            return Err(BatchFull {
                capacity: self.capacity,
            });
        }

        if !self.values.is_empty() {
            self.sql.push_str(", ");
        }
        self.values.push(token.to_owned());
        self.sql.push_str(&format!("(?{})", self.values.len()));
        Ok(())
    }

    pub(super) fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub(super) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(super) fn len(&self) -> usize {
        self.values.len()
    }

    pub(super) fn batches_flushed(&self) -> u64 {
        self.batches_flushed
    }

    /// The statement the pending tokens would execute as.
    pub(super) fn sql(&self) -> String {
        format!("{}{INSERT_SUFFIX}", self.sql)
    }

    /// Executes the pending batch inside `tx` and returns the number of rows
    /// actually inserted. Empty batches are a no-op. On failure the pending
    /// tokens are kept.
    pub(super) fn flush(&mut self, tx: &Transaction<'_>) -> rusqlite::Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }

        let sql = self.sql();
        let inserted = if self.is_full() {
            tx.prepare_cached(&sql)?
                .execute(params_from_iter(self.values.iter()))?
        } else {
            tx.execute(&sql, params_from_iter(self.values.iter()))?
        };

        self.batches_flushed += 1;
        debug!(
            batch = self.batches_flushed,
            tokens = self.values.len(),
            inserted,
            "flushed token batch"
        );
        self.reset();
        Ok(inserted)
    }

    fn reset(&mut self) {
        self.sql.clear();
        self.sql.push_str(INSERT_PREFIX);
        self.values.clear();
    }
}
