//! Reading the source file.
//!
//! - [`loader`]: initial chunk, load-more and read-to-end over one retained handle
//! - [`tail`]: growth polling once the loader reached end of file
//! - [`worker`]: background thread executing both as message-passing jobs

pub mod loader;
pub mod tail;
pub mod worker;

pub use loader::{estimate_total, load_initial, Chunk, Continuation, InitialLoad, Loader};
pub use tail::{TailBatch, TailMonitor};
pub use worker::{run_job, Job, JobEvent, JobKind, Worker};
