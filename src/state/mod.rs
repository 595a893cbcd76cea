//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal.
//! File reads are requested as jobs and their results fed back in.

pub mod app_state;
pub mod filter;
pub mod input_handler;
pub mod mode;
pub mod text_input;
pub mod transform;
pub mod view_state;

pub use app_state::{AppState, LoadPolicy, FAST_SCROLL_STEP, LINE_GUTTER};
pub use filter::{FilterEngine, FilterExpression};
pub use input_handler::{handle_entry_key, handle_manage_key, handle_overlay_key};
pub use mode::Mode;
pub use text_input::{InputOutcome, TextInput};
pub use transform::ViewTransformer;
pub use view_state::{ViewState, Viewport};
