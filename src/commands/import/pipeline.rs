use super::*;

/// Bytes of a single input line kept in memory; the remainder is discarded.
pub(super) const MAX_LINE_BYTES: usize = 1024;

/// Shared cancellation signal, checked on every line read and every flush.
#[derive(Debug, Clone, Default)]
pub(super) struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(super) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> ImportResult<()> {
        if self.is_cancelled() {
            return Err(ImportError::Cancelled);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(super) struct ImportSummary {
    pub(super) counts: ImportCounts,
    /// Invalid lines in input order (capped at `MAX_STORED_INVALID`), then
    /// duplicate notices sorted by token.
    pub(super) diagnostics: Vec<Diagnostic>,
}

/// Runs one import: ping, begin, ensure schema, collect, drain, commit.
///
/// Every mutation happens inside a single transaction. Any error, including
/// cancellation, drops the transaction uncommitted so the store keeps its
/// pre-run state.
pub(super) fn import_tokens<R: BufRead>(
    connection: &mut Connection,
    mut reader: R,
    batch_size: usize,
    cancel: &CancelFlag,
) -> ImportResult<ImportSummary> {
    let mut batch = InsertTokensBatch::new(batch_size)?;

    ping(connection)?;
    cancel.check()?;

    let tx = connection.transaction().map_err(ImportError::Begin)?;
    ensure_token_table(&tx)?;
    debug!("token table ensured");

    let collected = collect_tokens(&mut reader, cancel)?;
    let duplicates = collected.duplicates();
    for (token, count) in &duplicates {
        warn!(token = ?token, count, "token appears more than once, importing it once");
    }
    info!(
        lines = collected.lines_read(),
        invalid = collected.invalid_lines(),
        unique = collected.len(),
        duplicates = duplicates.len(),
        "collected tokens"
    );

    let rows_inserted = drain_tokens(&collected, &mut batch, &tx, cancel)?;

    cancel.check()?;
    tx.commit().map_err(ImportError::Commit)?;

    let unique_tokens = collected.len() as u64;
    let counts = ImportCounts {
        lines_read: collected.lines_read(),
        valid_lines: collected.valid_lines(),
        invalid_lines: collected.invalid_lines(),
        unique_tokens,
        duplicate_tokens: duplicates.len() as u64,
        rows_inserted,
        rows_already_present: unique_tokens - rows_inserted,
        batches_flushed: batch.batches_flushed(),
    };

    let mut diagnostics = collected.invalid().to_vec();
    diagnostics.extend(
        duplicates
            .into_iter()
            .map(|(token, count)| Diagnostic::Duplicate {
                token: token.to_owned(),
                count,
            }),
    );

    Ok(ImportSummary {
        counts,
        diagnostics,
    })
}

fn collect_tokens<R: BufRead>(reader: &mut R, cancel: &CancelFlag) -> ImportResult<CollectedTokens> {
    let mut collector = TokenCollector::new();
    let mut buf = Vec::with_capacity(TOKEN_LEN + 2);
    let mut line_no = 0u64;

    loop {
        cancel.check()?;

        buf.clear();
        let read = read_line_bounded(reader, &mut buf, MAX_LINE_BYTES)
            .map_err(|source| ImportError::Read {
                line: line_no + 1,
                source,
            })?;
        if read == 0 {
            break;
        }

        line_no += 1;
        collector.observe(line_no, strip_line_terminator(&buf));
    }

    Ok(collector.finish())
}

/// Reads one line into `buf`, keeping at most `limit` bytes of it. Returns the
/// number of bytes consumed from `reader`, which is 0 only at end of input.
pub(super) fn read_line_bounded<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<usize> {
    let mut consumed = 0;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            return Ok(consumed);
        }

        let (chunk, line_done) = match available.iter().position(|byte| *byte == b'\n') {
            Some(end) => (&available[..=end], true),
            None => (available, false),
        };
        let room = limit.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);

        let used = chunk.len();
        reader.consume(used);
        consumed += used;
        if line_done {
            return Ok(consumed);
        }
    }
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn drain_tokens(
    collected: &CollectedTokens,
    batch: &mut InsertTokensBatch,
    tx: &Transaction<'_>,
    cancel: &CancelFlag,
) -> ImportResult<u64> {
    let mut inserted = 0u64;

    for token in collected.unique() {
        batch.add_token(token)?;
        if batch.is_full() {
            inserted += flush_batch(batch, tx, cancel)?;
        }
    }
    inserted += flush_batch(batch, tx, cancel)?;

    Ok(inserted)
}

fn flush_batch(
    batch: &mut InsertTokensBatch,
    tx: &Transaction<'_>,
    cancel: &CancelFlag,
) -> ImportResult<u64> {
    cancel.check()?;

    let pending = batch.len();
    let inserted = batch.flush(tx).map_err(|source| ImportError::Flush {
        batch: batch.batches_flushed() + 1,
        source,
    })?;
    if pending > 0 && inserted < pending {
        debug!(
            pending,
            skipped = pending - inserted,
            "skipped tokens already in store"
        );
    }
    Ok(inserted as u64)
}
