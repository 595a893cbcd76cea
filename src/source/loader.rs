//! Chunked reader for the source file.
//!
//! A [`Loader`] owns the only open handle on the source file and remembers the
//! byte offset and line number where it stopped. Reading a chunk consumes the
//! loader and hands back either the loader itself (more data may follow) or
//! the final byte offset (end of file reached, handle closed). Ownership is
//! what enforces "at most one outstanding load": whoever holds the loader is
//! the only one who can read.

use crate::model::{InputError, LineNumber, LogLine};
use crate::store::LineStore;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Open handle positioned after the last line handed out.
#[derive(Debug)]
pub struct Loader {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
    next_number: LineNumber,
}

/// What remains after reading a chunk.
#[derive(Debug)]
pub enum Continuation {
    /// End of file not reached yet; the handle is still open.
    More(Loader),
    /// End of file reached and the handle closed.
    ///
    /// `end_offset` is the number of bytes consumed, which is where tail
    /// monitoring has to pick up.
    Done { end_offset: u64 },
}

impl Continuation {
    pub fn is_done(&self) -> bool {
        matches!(self, Continuation::Done { .. })
    }
}

/// Lines read by one chunk plus whatever remains.
#[derive(Debug)]
pub struct Chunk {
    pub lines: Vec<LogLine>,
    pub continuation: Continuation,
}

/// Result of the first read at startup.
#[derive(Debug)]
pub struct InitialLoad {
    /// Store holding the first chunk, already marked fully loaded when the
    /// whole file fit.
    pub store: LineStore,
    pub continuation: Continuation,
}

/// Open `path` and read up to `chunk_size` lines into a fresh store.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if `path` does not exist and
/// `InputError::Unreadable` if it cannot be opened or read.
pub fn load_initial(path: &Path, chunk_size: usize) -> Result<InitialLoad, InputError> {
    let file = open_source(path)?;
    let loader = Loader {
        path: path.to_path_buf(),
        reader: BufReader::new(file),
        offset: 0,
        next_number: LineNumber::FIRST,
    };

    let chunk = loader.read_chunk(chunk_size).map_err(|e| match e {
        InputError::Io(source) => InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let mut store = LineStore::new();
    // A fresh loader numbers from 1, so this cannot be non-contiguous.
    if let Err(e) = store.append(chunk.lines) {
        debug!(error = %e, "initial chunk rejected by store");
    }
    if chunk.continuation.is_done() {
        store.mark_fully_loaded();
    }

    debug!(
        path = %path.display(),
        lines = store.len(),
        fully_loaded = store.is_fully_loaded(),
        "Initial chunk loaded"
    );

    Ok(InitialLoad {
        store,
        continuation: chunk.continuation,
    })
}

fn open_source(path: &Path) -> Result<File, InputError> {
    File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            InputError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InputError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

impl Loader {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset just past the last line handed out.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number the next line read will receive.
    pub fn next_number(&self) -> LineNumber {
        self.next_number
    }

    /// Read up to `count` lines, continuing where the previous chunk stopped.
    ///
    /// End of file is detected by peeking the buffer after the last line, so a
    /// chunk that exactly exhausts the file already reports `Done`.
    ///
    /// A final fragment without a trailing newline is left unread: `Done`
    /// reports the offset where it starts, so the tail monitor numbers it once
    /// the writer finishes the line.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if reading fails. The handle is dropped either
    /// way, so the caller should treat the file as exhausted.
    pub fn read_chunk(mut self, count: usize) -> Result<Chunk, InputError> {
        let mut lines = Vec::with_capacity(count.min(4096));
        let mut buf = Vec::new();

        while lines.len() < count {
            buf.clear();
            let read = self.reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            if !buf.ends_with(b"\n") {
                debug!(bytes = read, "Unterminated last line left for the tail monitor");
                break;
            }
            self.offset += read as u64;
            lines.push(LogLine::parse(self.next_number, decode_line(&buf)));
            self.next_number = self.next_number.next();
        }

        let at_eof = self.reader.fill_buf()?.is_empty();
        let continuation = if at_eof {
            Continuation::Done {
                end_offset: self.offset,
            }
        } else {
            Continuation::More(self)
        };

        Ok(Chunk {
            lines,
            continuation,
        })
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode as UTF-8, replacing
/// invalid sequences.
pub(crate) fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Approximate the total number of lines in `path` from its first
/// `sample_size` lines.
///
/// Computes the average bytes per line (terminator included) over the sample
/// and divides the file size by it. Returns 0 for an empty file. The figure
/// is for progress display only.
///
/// # Errors
///
/// Returns `InputError` if the file cannot be opened or read.
pub fn estimate_total(path: &Path, sample_size: usize) -> Result<usize, InputError> {
    let file = open_source(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut sampled_lines: u64 = 0;
    let mut sampled_bytes: u64 = 0;
    let mut buf = Vec::new();
    while sampled_lines < sample_size as u64 {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        sampled_lines += 1;
        sampled_bytes += read as u64;
    }

    if sampled_lines == 0 || sampled_bytes == 0 {
        return Ok(0);
    }

    let average = sampled_bytes as f64 / sampled_lines as f64;
    Ok((file_size as f64 / average).round() as usize)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
