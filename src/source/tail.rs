//! Growth polling for a file that is still being written.
//!
//! The monitor starts where the loader stopped and only ever moves forward.
//! A poll reads complete (newline-terminated) lines past the baseline and
//! returns them with the baseline they would move to; the caller commits that
//! baseline once the lines are safely in the store. A partially written last
//! line stays unread until its newline arrives.

use crate::model::{InputError, LineNumber, LogLine};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::loader::decode_line;

/// Tracks how far into the source file lines have been consumed.
#[derive(Debug)]
pub struct TailMonitor {
    path: PathBuf,
    offset: u64,
    next_number: LineNumber,
}

/// Lines found by one poll, plus the position they end at.
#[derive(Debug)]
pub struct TailBatch {
    pub lines: Vec<LogLine>,
    end_offset: u64,
    next_number: LineNumber,
}

impl TailBatch {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Baseline this batch moves the monitor to once committed.
    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }
}

impl TailMonitor {
    /// Start monitoring `path` from byte `offset`, numbering the next line
    /// `next_number`.
    pub fn new(path: impl Into<PathBuf>, offset: u64, next_number: LineNumber) -> Self {
        Self {
            path: path.into(),
            offset,
            next_number,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes consumed so far. Never decreases.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn next_number(&self) -> LineNumber {
        self.next_number
    }

    /// Read complete lines written past the baseline.
    ///
    /// Returns an empty batch if the file did not grow. A file that shrank is
    /// treated as unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the file vanished or cannot be read.
    pub fn poll(&self) -> Result<TailBatch, InputError> {
        let size = fs::metadata(&self.path)?.len();
        if size <= self.offset {
            return Ok(self.empty_batch());
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut reader = BufReader::new(file);

        let mut lines = Vec::new();
        let mut end_offset = self.offset;
        let mut next_number = self.next_number;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 || !buf.ends_with(b"\n") {
                break;
            }
            end_offset += read as u64;
            lines.push(LogLine::parse(next_number, decode_line(&buf)));
            next_number = next_number.next();
        }

        Ok(TailBatch {
            lines,
            end_offset,
            next_number,
        })
    }

    /// Move the baseline past `batch`.
    ///
    /// Batches that would move the baseline backwards are ignored.
    pub fn commit(&mut self, batch: &TailBatch) {
        if batch.end_offset >= self.offset && batch.next_number >= self.next_number {
            self.offset = batch.end_offset;
            self.next_number = batch.next_number;
        }
    }

    fn empty_batch(&self) -> TailBatch {
        TailBatch {
            lines: Vec::new(),
            end_offset: self.offset,
            next_number: self.next_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::TempLog;
    use proptest::prelude::*;

    fn numbers(batch: &TailBatch) -> Vec<usize> {
        batch.lines.iter().map(|l| l.number().get()).collect()
    }

    fn monitor_at_end(log: &TempLog, next: usize) -> TailMonitor {
        let size = fs::metadata(log.path()).unwrap().len();
        TailMonitor::new(log.path(), size, LineNumber::new(next).unwrap())
    }

    #[test]
    fn unchanged_file_yields_empty_batch() {
        let log = TempLog::new("tail-unchanged.jsonl", "{\"a\":1}\n");
        let monitor = monitor_at_end(&log, 2);

        let batch = monitor.poll().unwrap();

        assert!(batch.is_empty());
        assert_eq!(batch.end_offset(), monitor.offset());
    }

    #[test]
    fn growth_is_numbered_after_existing_lines() {
        let log = TempLog::new("tail-growth.jsonl", "{\"a\":1}\n{\"a\":2}\n");
        let mut monitor = monitor_at_end(&log, 3);

        log.append("{\"a\":3}\nnot json\n");
        let batch = monitor.poll().unwrap();

        assert_eq!(numbers(&batch), vec![3, 4]);
        assert!(batch.lines[0].is_valid());
        assert!(!batch.lines[1].is_valid());

        monitor.commit(&batch);
        assert_eq!(monitor.next_number().get(), 5);
        assert_eq!(monitor.offset(), fs::metadata(log.path()).unwrap().len());
    }

    #[test]
    fn baseline_moves_only_on_commit() {
        let log = TempLog::new("tail-commit.jsonl", "");
        let monitor = monitor_at_end(&log, 1);

        log.append("{\"a\":1}\n");
        let first = monitor.poll().unwrap();
        let second = monitor.poll().unwrap();

        // Without a commit the same bytes are offered again.
        assert_eq!(numbers(&first), vec![1]);
        assert_eq!(numbers(&second), vec![1]);
        assert_eq!(monitor.offset(), 0);
    }

    #[test]
    fn partial_line_waits_for_newline() {
        let log = TempLog::new("tail-partial.jsonl", "");
        let mut monitor = monitor_at_end(&log, 1);

        log.append("{\"a\":1}\n{\"a\":");
        let batch = monitor.poll().unwrap();
        assert_eq!(numbers(&batch), vec![1]);
        monitor.commit(&batch);

        log.append("2}\n");
        let batch = monitor.poll().unwrap();
        assert_eq!(numbers(&batch), vec![2]);
        assert_eq!(batch.lines[0].raw(), "{\"a\":2}");
    }

    #[test]
    fn shrunk_file_is_ignored() {
        let log = TempLog::new("tail-shrink.jsonl", "{\"a\":1}\n{\"a\":2}\n");
        let monitor = monitor_at_end(&log, 3);

        log.truncate();
        let batch = monitor.poll().unwrap();

        assert!(batch.is_empty());
        assert!(batch.end_offset() >= monitor.offset());
    }

    #[test]
    fn deleted_file_is_an_error() {
        let log = TempLog::new("tail-deleted.jsonl", "{\"a\":1}\n");
        let monitor = monitor_at_end(&log, 2);

        log.remove();

        assert!(monitor.poll().is_err());
    }

    #[test]
    fn stale_commit_does_not_move_baseline_back() {
        let log = TempLog::new("tail-stale.jsonl", "");
        let mut monitor = monitor_at_end(&log, 1);

        let stale = monitor.poll().unwrap();
        log.append("{\"a\":1}\n");
        let fresh = monitor.poll().unwrap();
        monitor.commit(&fresh);
        monitor.commit(&stale);

        assert_eq!(monitor.offset(), 8);
        assert_eq!(monitor.next_number().get(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Across arbitrary appends the baseline never decreases and every
        /// appended complete line is delivered exactly once, in order.
        #[test]
        fn baseline_is_monotonic_and_lines_are_delivered_once(
            writes in proptest::collection::vec((0usize..4, any::<bool>()), 1..12),
        ) {
            let log = TempLog::new("tail-prop.jsonl", "");
            let mut monitor = monitor_at_end(&log, 1);
            let mut delivered = Vec::new();
            let mut written = 0usize;
            let mut pending_partial = false;

            for (count, partial) in writes {
                let mut chunk = String::new();
                if pending_partial {
                    chunk.push_str("}\n");
                    written += 1;
                    pending_partial = false;
                }
                for _ in 0..count {
                    written += 1;
                    chunk.push_str(&format!("{{\"n\":{written}}}\n"));
                }
                if partial {
                    chunk.push_str("{\"p\":0");
                    pending_partial = true;
                }
                log.append(&chunk);

                let before = monitor.offset();
                let batch = monitor.poll().unwrap();
                delivered.extend(numbers(&batch));
                monitor.commit(&batch);
                prop_assert!(monitor.offset() >= before);
            }

            let expected: Vec<usize> = (1..=written).collect();
            prop_assert_eq!(delivered, expected);
        }
    }
}
