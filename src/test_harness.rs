//! Test helpers: scratch log files and an acceptance harness.
//!
//! `TempLog` owns a JSONL file in the system temp directory that tests can
//! grow, truncate or delete to simulate a live log. `AcceptanceTestHarness`
//! wraps `TuiApp<TestBackend>` so user stories can be driven key by key, with
//! background jobs executed inline.

use crate::config::keybindings::KeyBindings;
use crate::source::load_initial;
use crate::state::{AppState, LoadPolicy};
use crate::view::{TuiApp, TuiError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A log file removed again when dropped.
#[derive(Debug)]
pub struct TempLog {
    path: PathBuf,
}

impl TempLog {
    /// Create a file named after `name` with the given contents.
    ///
    /// The path is unique per process and call, so tests may run in parallel.
    pub fn new(name: &str, contents: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("sift-test-{}-{id}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(name);
        fs::write(&path, contents).expect("write temp log");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw text to the end of the file.
    pub fn append(&self, text: &str) {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .expect("open temp log for append");
        file.write_all(text.as_bytes()).expect("append to temp log");
    }

    /// Cut the file to zero bytes.
    pub fn truncate(&self) {
        fs::write(&self.path, "").expect("truncate temp log");
    }

    /// Delete the file (the directory stays until drop).
    pub fn remove(&self) {
        fs::remove_file(&self.path).expect("remove temp log");
    }
}

impl Drop for TempLog {
    fn drop(&mut self) {
        if let Some(dir) = self.path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}

/// `count` lines of `{"n":i,"level":...}` with every third line at error level.
pub fn numbered_jsonl(count: usize) -> String {
    (1..=count)
        .map(|n| {
            let level = if n % 3 == 0 { "error" } else { "info" };
            format!("{{\"n\":{n},\"level\":\"{level}\"}}\n")
        })
        .collect()
}

/// Convert a ratatui buffer to text, one row per line, trailing blanks trimmed.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

/// Drives a `TuiApp<TestBackend>` the way a user would.
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    running: bool,
}

impl AcceptanceTestHarness {
    /// Open `path` in an 80x24 terminal with the default loading policy.
    pub fn open(path: &Path) -> Result<Self, TuiError> {
        Self::open_with(path, 80, 24, 1000, LoadPolicy::default())
    }

    /// Open `path` with a custom terminal size, initial chunk and policy.
    pub fn open_with(
        path: &Path,
        width: u16,
        height: u16,
        initial_chunk: usize,
        policy: LoadPolicy,
    ) -> Result<Self, TuiError> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        let initial = load_initial(path, initial_chunk)?;
        let state = AppState::new(path, initial, policy);
        let app = TuiApp::new_for_test(terminal, state, KeyBindings::default());
        Ok(Self { app, running: true })
    }

    /// Send a key without modifiers. Returns true once the app has quit.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }
        if self.app.handle_key_test(KeyEvent::new(key, mods)) {
            self.running = false;
        }
        !self.running
    }

    /// Type each character of `text` as a key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            if self.send_key(KeyCode::Char(ch)) {
                break;
            }
        }
    }

    /// Run one timer tick (spinner, tail poll).
    pub fn tick(&mut self) {
        self.app.tick_test();
    }

    pub fn state(&self) -> &AppState {
        self.app.app_state()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn render_to_string(&mut self) -> String {
        self.app
            .render_test()
            .expect("Rendering should succeed in test harness");
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}
