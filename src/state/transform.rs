//! Optional view transform: reshapes how a line is displayed, never whether
//! it is displayed.

use crate::model::{LogLine, QueryError};
use crate::query::{self, Query};
use std::borrow::Cow;

/// Single-slot holder for the active view expression.
#[derive(Debug, Default)]
pub struct ViewTransformer {
    active: Option<Query>,
}

impl ViewTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active expression. Blank input clears it.
    ///
    /// # Errors
    ///
    /// Returns the compile error and keeps the previous expression.
    pub fn set(&mut self, source: &str) -> Result<(), QueryError> {
        if source.trim().is_empty() {
            self.active = None;
            return Ok(());
        }
        self.active = Some(Query::compile(source)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Source text of the active expression.
    pub fn source(&self) -> Option<&str> {
        self.active.as_ref().map(Query::source)
    }

    /// Text to show for `line` in the list.
    ///
    /// Falls back to the raw text when there is no active expression, the
    /// line is invalid, evaluation fails, or the expression yields nothing.
    pub fn display_text<'a>(&self, line: &'a LogLine) -> Cow<'a, str> {
        let (Some(expr), Some(json)) = (&self.active, line.json()) else {
            return Cow::Borrowed(line.raw());
        };
        match expr.first(json) {
            Some(Ok(value)) => Cow::Owned(query::display_text(&value)),
            _ => Cow::Borrowed(line.raw()),
        }
    }
}
