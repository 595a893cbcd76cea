//! Application state and transitions.
//!
//! `AppState` ties the store, the filter engine, the view transform and the
//! view state together. It never performs I/O: reads are requested by
//! queueing a [`Job`] (collected by the shell with [`AppState::take_jobs`])
//! and their results come back through [`AppState::handle_job_event`]. That
//! keeps every transition synchronous and testable without a terminal or a
//! thread.
//!
//! # Source lifecycle
//!
//! ```text
//!  Lazy(loader) ──load more / to end──▶ Loading ──chunk──▶ Lazy(loader)
//!                                         │
//!                                         └──end of file──▶ Tailing(monitor) ⇄ Polling
//!  any read failure ──────────────────────────────────────▶ Closed
//! ```
//!
//! Whoever holds the loader or monitor is the only party that may read the
//! file, so at most one request is ever outstanding.

use crate::model::{KeyAction, LineNumber, LogLine, QueryError, StoreError};
use crate::source::{Continuation, InitialLoad, Job, JobEvent, JobKind, Loader, TailMonitor};
use crate::state::filter::{FilterEngine, FilterExpression};
use crate::state::mode::Mode;
use crate::state::text_input::TextInput;
use crate::state::transform::ViewTransformer;
use crate::state::view_state::ViewState;
use crate::store::LineStore;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

/// Columns taken by the selection marker and the reserved rightmost column.
pub const LINE_GUTTER: usize = 3;

/// Columns moved by a fast horizontal scroll.
pub const FAST_SCROLL_STEP: isize = 5;

/// Chunk sizes and thresholds for lazy loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Lines read per load-more request.
    pub load_more_chunk: usize,
    /// Lines read per batch while reading to the end.
    pub load_to_end_batch: usize,
    /// Request more lines once the selection is this close to the end.
    pub trigger_threshold: usize,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            load_more_chunk: 500,
            load_to_end_batch: 1000,
            trigger_threshold: 100,
        }
    }
}

/// Who currently holds the ability to read the source file.
#[derive(Debug)]
enum SourceState {
    /// More lines remain; the loader is idle.
    Lazy(Loader),
    /// A load job owns the loader.
    Loading(JobKind),
    /// Fully loaded; the monitor is idle until the next tick.
    Tailing(TailMonitor),
    /// A poll job owns the monitor.
    Polling,
    /// Reading stopped after a failure.
    Closed,
}

/// What to do once the whole file has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EndIntent {
    /// Select the last visible line.
    Jump,
    /// Select the last visible line and follow new ones.
    Follow,
}

/// Application state. Pure data, no side effects.
#[derive(Debug)]
pub struct AppState {
    path: PathBuf,
    store: LineStore,
    filters: FilterEngine,
    transform: ViewTransformer,
    view: ViewState,
    mode: Mode,
    source: SourceState,
    policy: LoadPolicy,
    tail_follow: bool,
    end_intent: Option<EndIntent>,
    estimated_total: usize,
    spinner_frame: usize,
    should_quit: bool,
    outbox: Vec<Job>,
}

impl AppState {
    /// Build the state around the initial chunk read at startup.
    pub fn new(path: impl Into<PathBuf>, initial: InitialLoad, policy: LoadPolicy) -> Self {
        let path = path.into();
        let InitialLoad {
            store,
            continuation,
        } = initial;
        let source = match continuation {
            Continuation::More(loader) => SourceState::Lazy(loader),
            Continuation::Done { end_offset } => SourceState::Tailing(TailMonitor::new(
                path.clone(),
                end_offset,
                store.next_number(),
            )),
        };

        let mut filters = FilterEngine::new();
        filters.recompute(&store);

        Self {
            path,
            store,
            filters,
            transform: ViewTransformer::new(),
            view: ViewState::new(),
            mode: Mode::Normal,
            source,
            policy,
            tail_follow: false,
            end_intent: None,
            estimated_total: 0,
            spinner_frame: 0,
            should_quit: false,
            outbox: Vec::new(),
        }
    }

    // ===== Accessors =====

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in the status bar.
    pub fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn transform(&self) -> &ViewTransformer {
        &self.transform
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub(crate) fn mode_mut(&mut self) -> &mut Mode {
        &mut self.mode
    }

    /// Line numbers currently shown, in order.
    pub fn visible(&self) -> &[LineNumber] {
        self.filters.visible()
    }

    pub fn line(&self, number: LineNumber) -> Option<&LogLine> {
        self.store.get(number)
    }

    pub fn selected_line(&self) -> Option<&LogLine> {
        self.view
            .selected_line(self.filters.visible())
            .and_then(|n| self.store.get(n))
    }

    /// List text for `line`, after the view transform.
    pub fn display_text<'a>(&self, line: &'a LogLine) -> Cow<'a, str> {
        self.transform.display_text(line)
    }

    pub fn is_tail_follow(&self) -> bool {
        self.tail_follow
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.store.is_fully_loaded()
    }

    /// True while a read-to-end is running (or queued behind a load-more).
    pub fn is_loading_to_end(&self) -> bool {
        match self.source {
            SourceState::Loading(JobKind::LoadToEnd) => true,
            SourceState::Loading(_) => self.end_intent.is_some(),
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.source, SourceState::Loading(_))
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn estimated_total(&self) -> usize {
        self.estimated_total
    }

    pub fn set_estimated_total(&mut self, estimate: usize) {
        self.estimated_total = estimate;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Jobs queued since the last call, in the order they were requested.
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.outbox)
    }

    // ===== Mode transitions =====

    /// Switch mode, resetting the offsets the old and new modes own.
    pub fn set_mode(&mut self, next: Mode) {
        if self.mode.has_overlay() || next.has_overlay() {
            self.view.reset_overlay_scroll();
        }
        self.view.reset_h_offset();
        debug!(from = self.mode.name(), to = next.name(), "Mode change");
        self.mode = next;
    }

    /// Commit the text of the current entry mode.
    ///
    /// Compile failures leave the filter list or transform unchanged.
    pub fn submit_entry(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::FilterEntry(input) => {
                if !input.text().trim().is_empty() {
                    if let Err(e) = self.add_filter(input.text()) {
                        warn!(expression = input.text(), error = %e, "Filter rejected");
                    }
                }
                self.set_mode(Mode::Normal);
            }
            Mode::FilterEdit { index, input } => {
                if !input.text().trim().is_empty() {
                    if let Err(e) = self.edit_filter(index, input.text()) {
                        warn!(expression = input.text(), error = %e, "Filter edit rejected");
                    }
                }
                self.set_mode(Mode::FilterManage { cursor: index });
            }
            Mode::ViewEntry(input) => {
                if let Err(e) = self.set_view(input.text()) {
                    warn!(expression = input.text(), error = %e, "View expression rejected");
                }
                self.set_mode(Mode::Normal);
            }
            other => self.mode = other,
        }
    }

    /// Abandon the current entry mode without changes.
    pub fn cancel_entry(&mut self) {
        let next = match &self.mode {
            Mode::FilterEdit { index, .. } => Mode::FilterManage { cursor: *index },
            _ => Mode::Normal,
        };
        self.set_mode(next);
    }

    // ===== Filter and view mutations =====

    /// Apply a filter mutation and re-anchor the selection to the line that
    /// was selected before it.
    fn mutate_filters<T>(&mut self, mutation: impl FnOnce(&mut FilterEngine) -> T) -> T {
        let anchor = self.view.selected_line(self.filters.visible());
        let result = mutation(&mut self.filters);
        self.refilter(anchor);
        result
    }

    /// Like [`Self::mutate_filters`] for mutations that compile an
    /// expression. A compile error leaves the visible sequence untouched.
    fn try_mutate_filters<T>(
        &mut self,
        mutation: impl FnOnce(&mut FilterEngine) -> Result<T, QueryError>,
    ) -> Result<T, QueryError> {
        let anchor = self.view.selected_line(self.filters.visible());
        let result = mutation(&mut self.filters)?;
        self.refilter(anchor);
        Ok(result)
    }

    fn refilter(&mut self, anchor: Option<LineNumber>) {
        self.filters.recompute(&self.store);
        self.view.reanchor(self.filters.visible(), anchor);
        self.view.reset_h_offset();
    }

    /// Compile and append an enabled filter.
    ///
    /// # Errors
    ///
    /// Returns the compile error; the filter list is unchanged.
    pub fn add_filter(&mut self, source: &str) -> Result<(), QueryError> {
        self.try_mutate_filters(|filters| filters.add(source))?;
        info!(expression = source, "Filter added");
        Ok(())
    }

    /// Replace the expression of filter `index`.
    ///
    /// # Errors
    ///
    /// Returns the compile error; the filter is unchanged.
    pub fn edit_filter(&mut self, index: usize, source: &str) -> Result<(), QueryError> {
        self.try_mutate_filters(|filters| filters.edit(index, source))
    }

    /// Flip filter `index` on or off. Returns `false` if there is no such
    /// filter.
    pub fn toggle_filter(&mut self, index: usize) -> bool {
        self.mutate_filters(|filters| filters.toggle(index))
    }

    /// Remove filter `index`, returning it.
    pub fn delete_filter(&mut self, index: usize) -> Option<FilterExpression> {
        self.mutate_filters(|filters| filters.delete(index))
    }

    /// Replace the view transform; blank input clears it.
    ///
    /// # Errors
    ///
    /// Returns the compile error; the previous transform stays active.
    pub fn set_view(&mut self, source: &str) -> Result<(), QueryError> {
        self.transform.set(source)?;
        self.view.reset_h_offset();
        Ok(())
    }

    // ===== Filter management =====

    /// Move the filter list cursor, clamped to the list.
    pub fn manage_move(&mut self, delta: isize) {
        let last = self.filters.len().saturating_sub(1);
        if let Mode::FilterManage { cursor } = &mut self.mode {
            *cursor = cursor.saturating_add_signed(delta).min(last);
        }
    }

    pub fn manage_toggle(&mut self) {
        if let Mode::FilterManage { cursor } = self.mode {
            self.toggle_filter(cursor);
        }
    }

    /// Delete the filter under the cursor and re-clamp the cursor.
    pub fn manage_delete(&mut self) {
        if let Mode::FilterManage { cursor } = self.mode {
            if let Some(removed) = self.delete_filter(cursor) {
                info!(expression = removed.source(), "Filter deleted");
            }
            let last = self.filters.len().saturating_sub(1);
            self.mode = Mode::FilterManage {
                cursor: cursor.min(last),
            };
        }
    }

    /// Open the filter under the cursor for editing.
    pub fn manage_edit(&mut self) {
        if let Mode::FilterManage { cursor } = self.mode {
            if let Some(filter) = self.filters.filters().get(cursor) {
                let input = TextInput::with_text(filter.source());
                self.set_mode(Mode::FilterEdit {
                    index: cursor,
                    input,
                });
            }
        }
    }

    // ===== Overlays =====

    /// Scroll the detail or help overlay whose content is `content_lines` tall.
    pub fn scroll_overlay(&mut self, delta: isize, content_lines: usize) {
        self.view.scroll_overlay(delta, content_lines);
    }

    /// Page size for overlay scrolling.
    pub fn page_height(&self) -> usize {
        self.view.list_height()
    }

    // ===== Normal mode =====

    /// Apply a Normal-mode action.
    pub fn handle_action(&mut self, action: KeyAction) {
        let len = self.filters.visible_len();
        match action {
            KeyAction::ScrollUp => self.view.move_by(-1, len),
            KeyAction::ScrollDown => {
                self.view.move_by(1, len);
                self.maybe_load_more();
            }
            KeyAction::PageUp => self.view.page_up(len),
            KeyAction::PageDown => {
                self.view.page_down(len);
                self.maybe_load_more();
            }
            KeyAction::ScrollToTop => self.view.to_top(),
            KeyAction::ScrollToBottom => self.request_end(EndIntent::Jump),
            KeyAction::ScrollLeft => self.scroll_horizontal(-1),
            KeyAction::ScrollRight => self.scroll_horizontal(1),
            KeyAction::FastScrollLeft => self.scroll_horizontal(-FAST_SCROLL_STEP),
            KeyAction::FastScrollRight => self.scroll_horizontal(FAST_SCROLL_STEP),
            KeyAction::OpenDetail => {
                if let Some(line) = self.view.selected_line(self.filters.visible()) {
                    self.set_mode(Mode::Detail { line });
                }
            }
            KeyAction::AddFilter => self.set_mode(Mode::FilterEntry(TextInput::new())),
            KeyAction::ManageFilters => self.set_mode(Mode::FilterManage { cursor: 0 }),
            KeyAction::EditView => {
                let input = TextInput::with_text(self.transform.source().unwrap_or_default());
                self.set_mode(Mode::ViewEntry(input));
            }
            KeyAction::ToggleTail => self.toggle_tail_follow(),
            KeyAction::Help => self.set_mode(Mode::Help),
            KeyAction::Back | KeyAction::Quit => self.quit(),
        }
    }

    /// Widest horizontal offset that still shows the end of the selected line.
    pub fn max_h_offset(&self) -> usize {
        let Some(line) = self.selected_line() else {
            return 0;
        };
        let width = self
            .view
            .viewport()
            .map(|v| usize::from(v.width))
            .unwrap_or(0);
        let text_width = self.display_text(line).width();
        text_width.saturating_sub(width.saturating_sub(LINE_GUTTER))
    }

    fn scroll_horizontal(&mut self, delta: isize) {
        let max = self.max_h_offset();
        self.view.scroll_horizontal(delta, max);
    }

    /// Record the terminal size; a wider terminal may shrink the h-scroll bound.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.view.resize(width, height, self.filters.visible_len());
        let max = self.max_h_offset();
        self.view.scroll_horizontal(0, max);
    }

    /// Turn tail-follow off, or read to the end and then turn it on.
    pub fn toggle_tail_follow(&mut self) {
        if self.tail_follow || self.end_intent == Some(EndIntent::Follow) {
            self.tail_follow = false;
            if self.end_intent == Some(EndIntent::Follow) {
                self.end_intent = None;
            }
            info!("Tail-follow disabled");
        } else {
            self.request_end(EndIntent::Follow);
        }
    }

    /// Start in tail-follow mode (as requested on the command line).
    pub fn enable_tail_follow(&mut self) {
        if !self.tail_follow {
            self.request_end(EndIntent::Follow);
        }
    }

    // ===== Loading =====

    fn maybe_load_more(&mut self) {
        let near_end = self.view.selected() + self.policy.trigger_threshold
            >= self.filters.visible_len();
        if !near_end || !matches!(self.source, SourceState::Lazy(_)) {
            return;
        }
        let next = SourceState::Loading(JobKind::LoadMore);
        if let SourceState::Lazy(loader) = std::mem::replace(&mut self.source, next) {
            debug!(next_line = %loader.next_number(), "Requesting more lines");
            self.outbox.push(Job::LoadMore {
                loader,
                count: self.policy.load_more_chunk,
            });
        }
    }

    /// Reading the whole file is the prerequisite of `intent`.
    fn request_end(&mut self, intent: EndIntent) {
        self.end_intent = self.end_intent.max(Some(intent));
        match std::mem::replace(&mut self.source, SourceState::Closed) {
            SourceState::Lazy(loader) => self.issue_load_to_end(loader),
            other => {
                self.source = other;
                if self.store.is_fully_loaded() {
                    self.finish_end_intent();
                }
            }
        }
    }

    fn issue_load_to_end(&mut self, loader: Loader) {
        info!(next_line = %loader.next_number(), "Reading to end of file");
        self.outbox.push(Job::LoadToEnd {
            loader,
            batch: self.policy.load_to_end_batch,
        });
        self.source = SourceState::Loading(JobKind::LoadToEnd);
    }

    fn finish_end_intent(&mut self) {
        let Some(intent) = self.end_intent.take() else {
            return;
        };
        if intent == EndIntent::Follow {
            self.tail_follow = true;
            info!("Tail-follow enabled");
        }
        self.view.reset_h_offset();
        self.view.request_jump_to_bottom(self.filters.visible_len());
    }

    /// Append lines to the store and fold them into the visible sequence.
    ///
    /// Returns how many of them became visible.
    fn append_lines(&mut self, lines: Vec<LogLine>) -> Result<usize, StoreError> {
        if lines.is_empty() {
            return Ok(0);
        }
        let anchor = self.view.selected_line(self.filters.visible());
        self.store.append(lines)?;
        let added = self.filters.extend(&self.store);
        self.view.reanchor(self.filters.visible(), anchor);
        Ok(added)
    }

    fn close_source(&mut self) {
        self.store.mark_fully_loaded();
        self.source = SourceState::Closed;
        self.finish_end_intent();
    }

    /// Consume the result of a background job.
    pub fn handle_job_event(&mut self, event: JobEvent) {
        match event {
            JobEvent::Progress { lines } => {
                if let Err(e) = self.append_lines(lines) {
                    warn!(error = %e, "Discarding batch");
                }
            }
            JobEvent::Loaded {
                lines,
                continuation,
            } => {
                if let Err(e) = self.append_lines(lines) {
                    warn!(error = %e, "Discarding chunk; no further reads");
                    self.close_source();
                    return;
                }
                match continuation {
                    Continuation::More(loader) if self.end_intent.is_some() => {
                        self.issue_load_to_end(loader)
                    }
                    Continuation::More(loader) => {
                        debug!(lines = self.store.len(), "Chunk loaded");
                        self.source = SourceState::Lazy(loader);
                    }
                    Continuation::Done { end_offset } => {
                        self.store.mark_fully_loaded();
                        info!(lines = self.store.len(), "Source fully loaded");
                        self.source = SourceState::Tailing(TailMonitor::new(
                            self.path.clone(),
                            end_offset,
                            self.store.next_number(),
                        ));
                        self.finish_end_intent();
                    }
                }
            }
            JobEvent::Polled { mut monitor, mut batch } => {
                if !batch.is_empty() {
                    let lines = std::mem::take(&mut batch.lines);
                    let count = lines.len();
                    match self.append_lines(lines) {
                        Ok(added) => {
                            monitor.commit(&batch);
                            debug!(count, added, "Tail growth");
                            if self.tail_follow && added > 0 {
                                self.view
                                    .request_jump_to_bottom(self.filters.visible_len());
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Tail batch rejected; polling stopped");
                            self.source = SourceState::Closed;
                            return;
                        }
                    }
                }
                self.source = SourceState::Tailing(monitor);
            }
            JobEvent::Failed { kind, error } => {
                warn!(?kind, error = %error, "Source read failed; no further reads");
                self.close_source();
            }
        }
    }

    /// Periodic work: advance the spinner and poll for growth.
    pub fn tick(&mut self) {
        if self.is_loading_to_end() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if !matches!(self.source, SourceState::Tailing(_)) {
            return;
        }
        if let SourceState::Tailing(monitor) =
            std::mem::replace(&mut self.source, SourceState::Polling)
        {
            self.outbox.push(Job::Poll(monitor));
        }
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
