//! Runs engine operations off the calling thread.
//!
//! [`OpExecutor::spawn`] starts the blocking engine call on a worker thread
//! and returns a [`RunningOperation`]. The calling thread polls its progress,
//! may cancel it, and finally joins it with [`RunningOperation::wait`].

use crate::engine::{CancelToken, MessageSink, OperationInput, PackEngine};
use crate::error::{Error, Result};
use crate::message::{Message, MessageStore};
use crate::progress::{MonitorScope, PhaseProgress, ProgressMonitor, PROGRESS_DONE};
use crate::result::{OperationOutput, ResultCode};

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default interval between progress polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a polling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Progress reached 100.
    Completed,
    /// The monitor reported a user abort and the operation was cancelled.
    Aborted {
        /// Progress forwarded to the monitor before the abort.
        reported: u32,
    },
}

impl PollOutcome {
    /// Total progress forwarded by the polling loop.
    pub fn reported(self) -> u32 {
        match self {
            PollOutcome::Completed => PROGRESS_DONE,
            PollOutcome::Aborted { reported } => reported,
        }
    }

    /// Returns true if the monitor aborted.
    pub fn is_aborted(self) -> bool {
        matches!(self, PollOutcome::Aborted { .. })
    }
}

/// Executor configuration and entry point.
#[derive(Debug, Clone)]
pub struct OpExecutor {
    validate_input: bool,
    poll_interval: Duration,
}

impl Default for OpExecutor {
    fn default() -> Self {
        Self {
            validate_input: cfg!(debug_assertions),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl OpExecutor {
    /// Creates an executor. Input validation is on in debug builds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables input validation before the engine runs.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_input = enabled;
        self
    }

    /// Sets the progress poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns true if input validation is enabled.
    pub fn validates_input(&self) -> bool {
        self.validate_input
    }

    /// Starts the operation on a worker thread.
    pub fn spawn(
        &self,
        engine: Arc<dyn PackEngine>,
        input: OperationInput,
    ) -> Result<RunningOperation> {
        let progress = Arc::new(PhaseProgress::new());
        let cancel = CancelToken::new();
        let (sender, receiver) = mpsc::channel();

        let sink = MessageSink::new(sender, Arc::clone(&progress));
        let worker_cancel = cancel.clone();
        let worker_progress = Arc::clone(&progress);
        let validate = self.validate_input;

        let handle = thread::Builder::new()
            .name("uvpack-worker".into())
            .spawn(move || {
                let _done = CompleteOnExit(worker_progress);
                let start = Instant::now();

                if validate {
                    if let Some(diagnostic) = engine.validate(&input) {
                        return Err(Error::Validation(diagnostic));
                    }
                }

                let code = engine.entry(&input, &sink, &worker_cancel);
                let elapsed_ms = start.elapsed().as_millis() as u64;
                log::debug!("engine returned {:?} after {}ms", code, elapsed_ms);
                Ok((code, elapsed_ms))
            })
            .map_err(Error::WorkerSpawn)?;

        Ok(RunningOperation {
            progress,
            cancel,
            receiver,
            handle: Some(handle),
        })
    }

    /// Runs the operation to completion, relaying progress to `monitor`.
    ///
    /// The monitor is opened for the duration of the call. If it reports an
    /// abort, the operation is cancelled and the engine's result is still
    /// collected. After polling stops, one final step forwards the progress
    /// made since the last poll.
    pub fn execute<M: ProgressMonitor + ?Sized>(
        &self,
        engine: Arc<dyn PackEngine>,
        input: OperationInput,
        monitor: &mut M,
    ) -> Result<OperationOutput> {
        let operation = self.spawn(engine, input)?;
        {
            let mut scope = MonitorScope::new(monitor, PROGRESS_DONE);
            let outcome = operation.poll_progress(self.poll_interval, |delta| scope.step(delta));
            let remaining = operation
                .packing_progress()
                .saturating_sub(outcome.reported());
            scope.step(remaining);
        }
        operation.wait()
    }
}

/// Forces progress to done when the worker leaves, including by panic.
struct CompleteOnExit(Arc<PhaseProgress>);

impl Drop for CompleteOnExit {
    fn drop(&mut self) {
        self.0.complete();
    }
}

type WorkerResult = Result<(ResultCode, u64)>;

/// Handle to an operation running on a worker thread.
///
/// Dropping the handle without calling [`wait`](Self::wait) cancels the
/// operation and joins the worker.
pub struct RunningOperation {
    progress: Arc<PhaseProgress>,
    cancel: CancelToken,
    receiver: Receiver<Message>,
    handle: Option<JoinHandle<WorkerResult>>,
}

impl RunningOperation {
    /// Progress of the topology analysis phase, 0 to 100.
    pub fn topology_progress(&self) -> u32 {
        self.progress.topology()
    }

    /// Progress of the packing phase, 0 to 100.
    pub fn packing_progress(&self) -> u32 {
        self.progress.packing()
    }

    /// Signals the engine to stop. Returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true once the worker thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Polls packing progress every `interval` and forwards the increase to
    /// `step` until it reaches 100.
    ///
    /// `step` returns true to abort; the operation is then cancelled and
    /// polling stops at once.
    pub fn poll_progress(
        &self,
        interval: Duration,
        mut step: impl FnMut(u32) -> bool,
    ) -> PollOutcome {
        let mut reported = 0;

        while reported < PROGRESS_DONE {
            let delta = self.packing_progress().saturating_sub(reported);
            let aborted = step(delta);
            reported += delta;

            if aborted {
                log::debug!("progress monitor aborted at {}%, cancelling", reported);
                self.cancel();
                return PollOutcome::Aborted { reported };
            }

            thread::sleep(interval);
        }

        PollOutcome::Completed
    }

    /// Joins the worker and collects the result code and all messages.
    pub fn wait(mut self) -> Result<OperationOutput> {
        let handle = self.handle.take().ok_or(Error::WorkerPanicked)?;
        let (code, computation_time_ms) = handle.join().map_err(|_| Error::WorkerPanicked)??;

        let mut messages = MessageStore::default();
        messages.extend(self.receiver.try_iter());
        log::debug!(
            "operation finished with {:?}, {} messages received",
            code,
            messages.len()
        );

        Ok(OperationOutput {
            code,
            messages,
            computation_time_ms,
        })
    }
}

impl Drop for RunningOperation {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.cancel();
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for RunningOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningOperation")
            .field("topology", &self.topology_progress())
            .field("packing", &self.packing_progress())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
