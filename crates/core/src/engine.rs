//! The packing engine seam.
//!
//! A [`PackEngine`] wraps the external packing library. It receives the
//! operation input, sends owned [`Message`]s through a [`MessageSink`] while
//! it runs, watches a [`CancelToken`], and finally returns a [`ResultCode`].

use crate::message::Message;
use crate::params::PackParams;
use crate::progress::PhaseProgress;
use crate::result::ResultCode;
use crate::types::UvData;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Input of one engine operation.
#[derive(Debug, Clone)]
pub struct OperationInput {
    /// Parameter block.
    pub params: PackParams,
    /// UV map to operate on, shared with the calling thread.
    pub uv_data: Arc<UvData>,
}

impl OperationInput {
    /// Creates an operation input.
    pub fn new(params: PackParams, uv_data: UvData) -> Self {
        Self {
            params,
            uv_data: Arc::new(uv_data),
        }
    }
}

/// Cooperative cancellation flag shared with the worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Returns immediately.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receiving end for engine messages.
///
/// Progress reports update the shared counters before the message itself is
/// moved into the executor's channel.
#[derive(Debug, Clone)]
pub struct MessageSink {
    sender: Sender<Message>,
    progress: Arc<PhaseProgress>,
}

impl MessageSink {
    pub(crate) fn new(sender: Sender<Message>, progress: Arc<PhaseProgress>) -> Self {
        Self { sender, progress }
    }

    /// Hands a message over to the executor.
    pub fn send(&self, message: Message) {
        if let Message::ProgressReport(report) = &message {
            log::trace!("{:?} progress {:?}", report.phase, report.progress);
            self.progress.record(report);
        }

        // The receiver only goes away when the operation handle was dropped;
        // the message is released right here in that case.
        if self.sender.send(message).is_err() {
            log::trace!("operation handle dropped, discarding message");
        }
    }
}

/// A packing engine.
///
/// Implementations wrap a blocking call into the packing library. `entry`
/// runs on a worker thread and must return shortly after `cancel` is set.
pub trait PackEngine: Send + Sync {
    /// Checks that the input is well formed. Returns a diagnostic on failure.
    ///
    /// Expensive: may walk all UV data. Only called when input validation is
    /// enabled, which is the default in debug builds.
    ///
    /// The default runs [`UvData::check_indices`]. Besides index ranges it
    /// rejects faces with fewer than 3 vertices, so a host that hands over
    /// 2-point polygons fails validation in debug builds. Override this to
    /// accept them.
    fn validate(&self, input: &OperationInput) -> Option<String> {
        input.uv_data.check_indices()
    }

    /// Runs the operation to completion.
    fn entry(&self, input: &OperationInput, sink: &MessageSink, cancel: &CancelToken)
        -> ResultCode;
}
