//! # uvpack core
//!
//! Engine-facing half of the UV island packing bridge.
//!
//! The packing algorithm itself lives in an external library. This crate
//! describes how to talk to it and what to do with its answer:
//!
//! - **Wire types**: `UvVert`, `UvFace`, `UvData`, `IslandPackSolution`
//! - **Engine seam**: the `PackEngine` trait, messages and result codes
//! - **Executor**: runs an operation on a worker thread with progress
//!   relay and cooperative cancellation
//! - **Transforms**: rebuilds each island's affine transform and applies
//!   the pack solution to the original UVs
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod engine;
pub mod error;
pub mod executor;
pub mod message;
pub mod params;
pub mod progress;
pub mod result;
pub mod solution;
pub mod transform;
pub mod types;

// Re-exports
pub use engine::{CancelToken, MessageSink, OperationInput, PackEngine};
pub use error::{Error, HostError, Result};
pub use executor::{OpExecutor, PollOutcome, RunningOperation, DEFAULT_POLL_INTERVAL};
pub use message::{Message, MessageKind, MessageStore, PackingPhase, ProgressReport};
pub use params::{Opcode, PackParams};
pub use progress::{MonitorScope, NullMonitor, PhaseProgress, ProgressMonitor, PROGRESS_DONE};
pub use result::{OperationOutput, ResultCode};
pub use solution::apply_pack_solution;
pub use transform::UvTransform;
pub use types::{IslandPackSolution, UvData, UvFace, UvVert, VertKey};
