//! Append-only line store.
//!
//! The store is the single source of truth for every line read so far. The
//! loader and the tail monitor are its only writers; everything else reads.
//! Lines are never removed or reordered, so a line's index in the store is
//! always `number - 1`.

use crate::model::{LineNumber, LogLine, StoreError};

/// Ordered, gap-free collection of parsed log lines.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<LogLine>,
    fully_loaded: bool,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch that continues the current numbering.
    ///
    /// Returns the number of lines appended. The batch is rejected as a whole
    /// if any line breaks the `1..=len` numbering, leaving the store untouched.
    pub fn append(&mut self, batch: Vec<LogLine>) -> Result<usize, StoreError> {
        let mut expected = self.next_number();
        for line in &batch {
            if line.number() != expected {
                return Err(StoreError::NonContiguous {
                    expected,
                    found: line.number(),
                });
            }
            expected = expected.next();
        }

        let count = batch.len();
        self.lines.extend(batch);
        Ok(count)
    }

    /// Line number the next appended line must carry.
    pub fn next_number(&self) -> LineNumber {
        self.lines
            .last()
            .map(|line| line.number().next())
            .unwrap_or(LineNumber::FIRST)
    }

    pub fn get(&self, number: LineNumber) -> Option<&LogLine> {
        self.lines.get(number.index())
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines with index `start..` (used to filter only freshly appended lines).
    pub fn lines_from(&self, start: usize) -> &[LogLine] {
        self.lines.get(start..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True once the loader has reached end of file (or given up on it).
    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded
    }

    pub fn mark_fully_loaded(&mut self) {
        self.fully_loaded = true;
    }
}
