use super::*;

/// Invalid-line diagnostics kept for the summary; the rest only reach the log.
pub(super) const MAX_STORED_INVALID: usize = 1000;
/// Invalid lines longer than this are shortened in diagnostics and logs.
pub(super) const MAX_REPORTED_LINE_BYTES: usize = 64;

/// What happened to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Observation {
    Invalid,
    First,
    Repeat,
}

/// Deduplicates validated tokens for one import run.
///
/// Every key passed validation; its value counts the valid occurrences seen.
#[derive(Debug, Default)]
pub(super) struct TokenCollector {
    counts: HashMap<String, u64>,
    lines_read: u64,
    invalid_lines: u64,
    invalid: Vec<Diagnostic>,
}

impl TokenCollector {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Records one raw line (line terminator already stripped).
    pub(super) fn observe(&mut self, line_no: u64, line: &[u8]) -> Observation {
        self.lines_read += 1;

        if !is_valid_token(line) {
            self.invalid_lines += 1;
            let token = shorten_for_report(line);
            warn!(line = line_no, token = ?token, "token is invalid, skipping");
            if self.invalid.len() < MAX_STORED_INVALID {
                self.invalid.push(Diagnostic::Invalid {
                    line: line_no,
                    token,
                });
            } else if self.invalid_lines == MAX_STORED_INVALID as u64 + 1 {
                debug!(limit = MAX_STORED_INVALID, "further invalid lines are logged only");
            }
            return Observation::Invalid;
        }

        // Validated tokens are pure ASCII.
        let token = String::from_utf8_lossy(line);
        match self.counts.get_mut(&*token) {
            Some(count) => {
                *count += 1;
                Observation::Repeat
            }
            None => {
                self.counts.insert(token.into_owned(), 1);
                Observation::First
            }
        }
    }

    pub(super) fn finish(self) -> CollectedTokens {
        CollectedTokens {
            counts: self.counts,
            lines_read: self.lines_read,
            invalid_lines: self.invalid_lines,
            invalid: self.invalid,
        }
    }
}

/// The deduplicated result of a collection pass. Iteration order is arbitrary.
#[derive(Debug)]
pub(super) struct CollectedTokens {
    counts: HashMap<String, u64>,
    lines_read: u64,
    invalid_lines: u64,
    invalid: Vec<Diagnostic>,
}

impl CollectedTokens {
    pub(super) fn unique(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub(super) fn len(&self) -> usize {
        self.counts.len()
    }

    pub(super) fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub(super) fn valid_lines(&self) -> u64 {
        self.counts.values().sum()
    }

    pub(super) fn invalid_lines(&self) -> u64 {
        self.invalid_lines
    }

    /// The first `MAX_STORED_INVALID` invalid-line diagnostics, in input order.
    pub(super) fn invalid(&self) -> &[Diagnostic] {
        &self.invalid
    }

    /// Tokens seen more than once, with their occurrence counts, sorted by token.
    pub(super) fn duplicates(&self) -> Vec<(&str, u64)> {
        let mut duplicates = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(token, count)| (token.as_str(), *count))
            .collect::<Vec<_>>();
        duplicates.sort_unstable();
        duplicates
    }
}

fn shorten_for_report(line: &[u8]) -> String {
    if line.len() <= MAX_REPORTED_LINE_BYTES {
        return String::from_utf8_lossy(line).into_owned();
    }
    let head = String::from_utf8_lossy(&line[..MAX_REPORTED_LINE_BYTES]);
    format!("{head}...")
}
