//! TUI rendering and terminal management (impure shell)
//!
//! `TuiApp` owns the terminal, the application state and the background
//! worker. It turns terminal events into state calls, hands the jobs the
//! state emits to the worker, feeds finished jobs back, and redraws.

pub mod constants;
mod detail;
mod filter_manager;
mod help;
mod helpers;
pub mod highlighter;
mod layout;
mod log_pane;
mod status_bar;
mod styles;

pub use highlighter::{is_valid_theme, JsonHighlighter, VALID_THEMES};
pub use layout::{overlay_content_lines, render_layout};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::InputError;
use crate::source::{run_job, JobEvent, Worker};
use crate::state::{handle_entry_key, handle_manage_key, handle_overlay_key, AppState, Mode};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input file error
    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    key_bindings: KeyBindings,
    highlighter: JsonHighlighter,
    /// Background I/O. Without one, jobs run inline on the calling thread.
    worker: Option<Worker>,
    tick_interval: Duration,
    last_tick: Instant,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and starts the
    /// background worker.
    pub fn new(
        app_state: AppState,
        key_bindings: KeyBindings,
        highlighter: JsonHighlighter,
        tick_interval: Duration,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let mut app = Self {
            terminal,
            app_state,
            key_bindings,
            highlighter,
            worker: Some(Worker::spawn()),
            tick_interval,
            last_tick: Instant::now(),
        };
        let size = app.terminal.size()?;
        app.app_state.resize(size.width, size.height);
        Ok(app)
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Redraws after input, after finished
    /// jobs, and on ticks while the spinner is turning.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let mut dirty = false;
            let timeout = self.tick_interval.saturating_sub(self.last_tick.elapsed());

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        self.app_state.resize(width, height);
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                self.tick();
                dirty |= self.app_state.is_loading_to_end();
            }

            dirty |= self.drain_events();

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C quits from every mode, including text entry
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.app_state.quit();
            return true;
        }

        let mode = self.app_state.mode();
        let is_entry = mode.input().is_some();
        let is_manage = matches!(mode, Mode::FilterManage { .. });
        let is_overlay = mode.has_overlay();

        if is_entry {
            handle_entry_key(&mut self.app_state, key);
        } else if is_manage {
            handle_manage_key(&mut self.app_state, key);
        } else if is_overlay {
            let content_lines = overlay_content_lines(&self.app_state, &self.highlighter);
            handle_overlay_key(&mut self.app_state, key, content_lines);
        } else if let Some(action) = self.key_bindings.get(key) {
            self.app_state.handle_action(action);
        }

        self.dispatch_jobs();
        self.app_state.should_quit()
    }

    /// Advance the spinner and schedule a tail poll.
    fn tick(&mut self) {
        self.app_state.tick();
        self.dispatch_jobs();
    }

    /// Hand every queued job to the worker, or run it inline without one.
    fn dispatch_jobs(&mut self) {
        loop {
            let jobs = self.app_state.take_jobs();
            if jobs.is_empty() {
                return;
            }
            for job in jobs {
                match &self.worker {
                    Some(worker) => {
                        let kind = job.kind();
                        if !worker.submit(job) {
                            error!(?kind, "Background worker is gone");
                            self.app_state.handle_job_event(JobEvent::Failed {
                                kind,
                                error: InputError::Io(io::Error::other("background worker stopped")),
                            });
                        }
                    }
                    None => {
                        let mut events = Vec::new();
                        run_job(job, |event| events.push(event));
                        for event in events {
                            self.app_state.handle_job_event(event);
                        }
                    }
                }
            }
        }
    }

    /// Apply every finished job. Returns true if any arrived.
    fn drain_events(&mut self) -> bool {
        let Some(worker) = &self.worker else {
            return false;
        };
        let mut received = false;
        while let Some(event) = worker.try_recv() {
            self.app_state.handle_job_event(event);
            received = true;
        }
        if received {
            self.dispatch_jobs();
        }
        received
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let state = &self.app_state;
        let highlighter = &self.highlighter;
        self.terminal
            .draw(|frame| render_layout(frame, state, highlighter))?;
        Ok(())
    }
}

// ===== Test Helpers =====
//
// The following methods are ONLY for testing and benchmarking within the crate.
// They are gated with cfg to ensure they're not accessible from outside the crate.
//
// DO NOT use these in production code.

#[cfg(any(test, feature = "bench-internals"))]
#[allow(dead_code)] // Not all helpers used in every context (tests vs benchmarks)
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing (test-only constructor)
    ///
    /// No worker thread: jobs run inline as soon as they are queued, so a
    /// key press that loads lines has finished loading when it returns.
    ///
    /// **WARNING**: This is for testing only. Do not use in production code.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        mut app_state: AppState,
        key_bindings: KeyBindings,
    ) -> Self {
        if let Ok(size) = terminal.size() {
            app_state.resize(size.width, size.height);
        }
        let mut app = Self {
            terminal,
            app_state,
            key_bindings,
            highlighter: JsonHighlighter::default(),
            worker: None,
            tick_interval: Duration::ZERO,
            last_tick: Instant::now(),
        };
        app.dispatch_jobs();
        app
    }

    /// Get reference to app state (test-only accessor)
    pub(crate) fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// Handle a single keyboard event (test-only accessor)
    ///
    /// Returns true if app should quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    /// Run one timer tick (test-only accessor)
    pub(crate) fn tick_test(&mut self) {
        self.tick();
    }

    /// Render a single frame (test-only accessor)
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    /// Get reference to terminal (test-only accessor)
    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

// ===== Benchmark Helpers =====
//
// Public wrappers for benchmarks when bench-internals feature is enabled.
// These delegate to the pub(crate) test helpers above.

#[cfg(feature = "bench-internals")]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for benchmarking (benchmark-only constructor)
    pub fn new_for_bench(
        terminal: Terminal<B>,
        app_state: AppState,
        key_bindings: KeyBindings,
    ) -> Self {
        Self::new_for_test(terminal, app_state, key_bindings)
    }

    /// Handle a single keyboard event (benchmark-only accessor)
    pub fn handle_key_bench(&mut self, key: KeyEvent) -> bool {
        self.handle_key_test(key)
    }

    /// Render a single frame (benchmark-only accessor)
    pub fn render_bench(&mut self) -> Result<(), TuiError> {
        self.render_test()
    }

    /// Get reference to terminal (benchmark-only accessor)
    pub fn terminal_bench(&self) -> &Terminal<B> {
        self.terminal()
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// on exit, also when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(app_state: AppState, config: &ResolvedConfig) -> Result<(), TuiError> {
    let highlighter = JsonHighlighter::new(&config.theme);
    let mut app = match TuiApp::new(
        app_state,
        KeyBindings::default(),
        highlighter,
        config.poll_interval,
    ) {
        Ok(app) => app,
        Err(e) => {
            let _ = restore_terminal();
            return Err(e);
        }
    };

    let result = app.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
