//! Parsed log line types.
//!
//! A `LogLine` is created exactly once, when its physical line is first read
//! from the source file, and is immutable afterwards. Decoding is best-effort:
//! a line that is not valid JSON is still a line, just an invalid one.

use serde_json::Value;
use std::fmt;
use std::num::NonZeroUsize;

/// 1-based ordinal of a physical line in the source file.
///
/// Line numbers are the identity key of a line. They start at 1 and grow by
/// exactly one per line read, so a store of `n` lines holds `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineNumber(NonZeroUsize);

impl LineNumber {
    /// The first line of a file.
    pub const FIRST: LineNumber = LineNumber(NonZeroUsize::MIN);

    /// Smart constructor: `None` for zero.
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    /// The number as a plain `usize`.
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// The line number directly after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Zero-based index of this line in an append-only store.
    pub fn index(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single line of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    number: LineNumber,
    raw: String,
    json: Option<Value>,
}

impl LogLine {
    /// Parse `raw` as JSON and wrap it with its line number.
    ///
    /// Never fails: malformed JSON yields an invalid line.
    pub fn parse(number: LineNumber, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let json = serde_json::from_str::<Value>(&raw).ok();
        Self { number, raw, json }
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    /// The raw text as read, without its line terminator.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The decoded JSON value, if the raw text parsed.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// True iff the raw text parsed as a JSON value.
    pub fn is_valid(&self) -> bool {
        self.json.is_some()
    }
}
