//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for the numeric values shared by the renderers and
//! the overlay scroll bounds.

/// Height of the status bar in lines.
///
/// Every screen reserves the bottom row for it.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Columns the detail view leaves free when wrapping content.
pub const DETAIL_MARGIN: usize = 2;

/// Terminals narrower than this show list rows untruncated.
pub const TRUNCATION_MIN_WIDTH: usize = 15;

/// Appended to a list row cut at the terminal edge.
pub const ELLIPSIS: &str = "...";

/// Appended to rows whose raw text is not valid JSON.
pub const INVALID_SUFFIX: &str = " [INVALID JSON]";

/// Width of the spinner column at the right edge of the status bar.
pub const SPINNER_WIDTH: u16 = 2;

/// The wrapper looks this many columns back for a break character.
pub const WRAP_LOOKBACK: usize = 20;
