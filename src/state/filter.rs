//! Filter set and visible-sequence derivation.
//!
//! The visible sequence is the ordered list of line numbers currently shown.
//! With no filters at all it is every line in the store, valid or not. Once
//! at least one filter exists (even if every filter is disabled) only valid
//! lines qualify, and each enabled filter's first result must be truthy.

use crate::model::{LineNumber, LogLine, QueryError};
use crate::query::Query;
use crate::store::LineStore;
use tracing::debug;

/// One user-supplied predicate.
#[derive(Debug)]
pub struct FilterExpression {
    query: Query,
    enabled: bool,
}

impl FilterExpression {
    pub fn source(&self) -> &str {
        self.query.source()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Ordered filter list plus the visible sequence it derives from a store.
#[derive(Debug, Default)]
pub struct FilterEngine {
    filters: Vec<FilterExpression>,
    /// Line numbers passing every enabled filter, in store order.
    visible: Vec<LineNumber>,
    /// Number of store lines already examined.
    examined: usize,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &[FilterExpression] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.filters.iter().filter(|f| f.enabled).count()
    }

    /// Compile `source` and append it, enabled.
    ///
    /// # Errors
    ///
    /// Returns the compile error and leaves the filter list unchanged.
    pub fn add(&mut self, source: &str) -> Result<(), QueryError> {
        let query = Query::compile(source)?;
        self.filters.push(FilterExpression {
            query,
            enabled: true,
        });
        Ok(())
    }

    /// Replace the expression at `index`, keeping its enabled flag.
    ///
    /// Out-of-range indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns the compile error and leaves the filter unchanged.
    pub fn edit(&mut self, index: usize, source: &str) -> Result<(), QueryError> {
        let Some(filter) = self.filters.get_mut(index) else {
            return Ok(());
        };
        filter.query = Query::compile(source)?;
        Ok(())
    }

    /// Flip the enabled flag at `index`. Returns false if out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.filters.get_mut(index) {
            Some(filter) => {
                filter.enabled = !filter.enabled;
                true
            }
            None => false,
        }
    }

    /// Remove the filter at `index`.
    pub fn delete(&mut self, index: usize) -> Option<FilterExpression> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    /// Whether `line` belongs in the visible sequence.
    pub fn passes(&self, line: &LogLine) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        let Some(json) = line.json() else {
            return false;
        };
        self.filters
            .iter()
            .filter(|f| f.enabled)
            .all(|f| f.query.matches(json))
    }

    /// Rebuild the visible sequence from scratch.
    pub fn recompute(&mut self, store: &LineStore) {
        self.visible.clear();
        self.examined = 0;
        self.extend(store);
        debug!(
            visible = self.visible.len(),
            total = store.len(),
            filters = self.filters.len(),
            "Visible sequence recomputed"
        );
    }

    /// Examine lines appended to `store` since the last call.
    ///
    /// Returns how many of them became visible. Earlier lines keep their
    /// membership because neither they nor the filters changed.
    pub fn extend(&mut self, store: &LineStore) -> usize {
        let before = self.visible.len();
        for line in store.lines_from(self.examined) {
            if self.passes(line) {
                self.visible.push(line.number());
            }
        }
        self.examined = store.len();
        self.visible.len() - before
    }

    /// Line numbers of the visible sequence, in order.
    pub fn visible(&self) -> &[LineNumber] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
