//! sift
//!
//! Interactive terminal viewer for JSON-per-line log files: lazy chunked
//! loading, jq filters and view transforms, and live tailing.
//!
//! The core (`model`, `store`, `query`, `state`) is pure and tested without a
//! terminal. `source` does the file I/O and `view` owns the terminal.

pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod source;
pub mod state;
pub mod store;
pub mod view;

// Startup wiring
pub mod integration;

#[cfg(test)]
mod test_harness;
