//! Background file I/O.
//!
//! The event loop never touches the file itself. It sends a [`Job`] that owns
//! the [`Loader`] or [`TailMonitor`] to a single worker thread and later
//! receives a [`JobEvent`] that hands ownership back. Nothing is shared while
//! a job runs; the result is consumed exactly once by the loop.

use super::loader::{Continuation, Loader};
use super::tail::{TailBatch, TailMonitor};
use crate::model::{InputError, LogLine};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{debug, error};

/// Work the event loop can hand to the background thread.
#[derive(Debug)]
pub enum Job {
    /// Read one chunk of `count` lines.
    LoadMore { loader: Loader, count: usize },
    /// Read batches of `batch` lines until end of file.
    LoadToEnd { loader: Loader, batch: usize },
    /// Check the file for growth.
    Poll(TailMonitor),
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Job::LoadMore { .. } => JobKind::LoadMore,
            Job::LoadToEnd { .. } => JobKind::LoadToEnd,
            Job::Poll(_) => JobKind::Poll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    LoadMore,
    LoadToEnd,
    Poll,
}

/// Completion messages sent back to the event loop.
#[derive(Debug)]
pub enum JobEvent {
    /// An intermediate batch of a read-to-end. More events follow.
    Progress { lines: Vec<LogLine> },
    /// The last chunk of a load job. Returns the loader if the file has more.
    Loaded {
        lines: Vec<LogLine>,
        continuation: Continuation,
    },
    /// A tail poll finished. Returns the monitor with the uncommitted batch.
    Polled {
        monitor: TailMonitor,
        batch: TailBatch,
    },
    /// The job failed. Its loader or monitor is gone.
    Failed { kind: JobKind, error: InputError },
}

/// Execute `job` on the current thread, reporting every event to `emit`.
///
/// The worker thread is a loop around this function. Tests call it directly
/// to run jobs synchronously.
pub fn run_job(job: Job, mut emit: impl FnMut(JobEvent)) {
    let kind = job.kind();
    match job {
        Job::LoadMore { loader, count } => match loader.read_chunk(count) {
            Ok(chunk) => emit(JobEvent::Loaded {
                lines: chunk.lines,
                continuation: chunk.continuation,
            }),
            Err(error) => emit(JobEvent::Failed { kind, error }),
        },
        Job::LoadToEnd { mut loader, batch } => loop {
            match loader.read_chunk(batch) {
                Ok(chunk) => match chunk.continuation {
                    Continuation::More(next) => {
                        emit(JobEvent::Progress { lines: chunk.lines });
                        loader = next;
                    }
                    done @ Continuation::Done { .. } => {
                        emit(JobEvent::Loaded {
                            lines: chunk.lines,
                            continuation: done,
                        });
                        break;
                    }
                },
                Err(error) => {
                    emit(JobEvent::Failed { kind, error });
                    break;
                }
            }
        },
        Job::Poll(monitor) => match monitor.poll() {
            Ok(batch) => emit(JobEvent::Polled { monitor, batch }),
            Err(error) => emit(JobEvent::Failed { kind, error }),
        },
    }
}

/// Handle to the background I/O thread.
///
/// Dropping the handle closes both channels. The thread is not joined; it
/// ends after its current job or with the process, so quitting never waits
/// for a read-to-end of a large file.
#[derive(Debug)]
pub struct Worker {
    jobs: Sender<Job>,
    events: Receiver<JobEvent>,
}

impl Worker {
    pub fn spawn() -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (event_tx, event_rx) = mpsc::channel::<JobEvent>();

        thread::spawn(move || {
            debug!("Worker thread started");
            while let Ok(job) = job_rx.recv() {
                run_job(job, |event| {
                    // The loop is gone; nothing left to report to.
                    let _ = event_tx.send(event);
                });
            }
            debug!("Worker thread stopped");
        });

        Self {
            jobs: job_tx,
            events: event_rx,
        }
    }

    /// Queue a job. Returns false if the worker thread has died.
    pub fn submit(&self, job: Job) -> bool {
        self.jobs.send(job).is_ok()
    }

    /// Next finished event, without blocking.
    pub fn try_recv(&self) -> Option<JobEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                error!("Worker thread disconnected");
                None
            }
        }
    }

    /// Block until the next event arrives. Returns `None` if the worker died.
    pub fn recv(&self) -> Option<JobEvent> {
        self.events.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::loader::load_initial;
    use crate::test_harness::TempLog;

    fn jsonl(count: usize) -> String {
        (1..=count).map(|i| format!("{{\"i\":{i}}}\n")).collect()
    }

    fn open_loader(log: &TempLog, initial: usize) -> Loader {
        match load_initial(log.path(), initial).unwrap().continuation {
            Continuation::More(loader) => loader,
            Continuation::Done { .. } => panic!("file fit in the initial chunk"),
        }
    }

    fn collect(job: Job) -> Vec<JobEvent> {
        let mut events = Vec::new();
        run_job(job, |e| events.push(e));
        events
    }

    #[test]
    fn load_more_emits_single_loaded_event() {
        let log = TempLog::new("worker-more.jsonl", &jsonl(30));
        let loader = open_loader(&log, 10);

        let events = collect(Job::LoadMore { loader, count: 5 });

        assert_eq!(events.len(), 1);
        let JobEvent::Loaded { lines, continuation } = &events[0] else {
            panic!("expected Loaded, got {:?}", events[0]);
        };
        assert_eq!(lines.len(), 5);
        assert!(!continuation.is_done());
    }

    #[test]
    fn load_to_end_emits_progress_then_done() {
        let log = TempLog::new("worker-end.jsonl", &jsonl(25));
        let loader = open_loader(&log, 3);

        let events = collect(Job::LoadToEnd { loader, batch: 10 });

        // 22 remaining lines in batches of 10: 10, 10, 2.
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], JobEvent::Progress { lines } if lines.len() == 10));
        assert!(matches!(&events[1], JobEvent::Progress { lines } if lines.len() == 10));
        assert!(matches!(
            &events[2],
            JobEvent::Loaded { lines, continuation } if lines.len() == 2 && continuation.is_done()
        ));
    }

    #[test]
    fn poll_of_deleted_file_fails() {
        let log = TempLog::new("worker-poll.jsonl", "");
        let monitor = TailMonitor::new(log.path(), 0, crate::model::LineNumber::FIRST);
        log.remove();

        let events = collect(Job::Poll(monitor));

        assert!(matches!(
            &events[..],
            [JobEvent::Failed {
                kind: JobKind::Poll,
                ..
            }]
        ));
    }

    #[test]
    fn spawned_worker_runs_jobs_in_order() {
        let log = TempLog::new("worker-thread.jsonl", &jsonl(12));
        let loader = open_loader(&log, 2);
        let worker = Worker::spawn();

        assert!(worker.submit(Job::LoadMore { loader, count: 4 }));
        let Some(JobEvent::Loaded {
            lines,
            continuation: Continuation::More(loader),
        }) = worker.recv()
        else {
            panic!("expected a chunk with more to come");
        };
        assert_eq!(lines.first().map(|l| l.number().get()), Some(3));

        assert!(worker.submit(Job::LoadToEnd { loader, batch: 100 }));
        let Some(JobEvent::Loaded { lines, continuation }) = worker.recv() else {
            panic!("expected final chunk");
        };
        assert_eq!(lines.len(), 6);
        assert!(continuation.is_done());
    }
}
