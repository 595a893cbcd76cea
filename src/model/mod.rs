//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod key_action;
pub mod log_line;

// Re-export for convenience
pub use error::{InputError, QueryError, StartupError, StoreError};
pub use key_action::KeyAction;
pub use log_line::{LineNumber, LogLine};
