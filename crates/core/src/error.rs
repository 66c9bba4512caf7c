//! Error types for UV packing operations.

use crate::message::MessageKind;
use crate::result::ResultCode;
use thiserror::Error;

/// Result type alias for uvpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed call into the host application.
///
/// Hosts report failures as a raw result code plus a short description of
/// the call that failed. Any host failure aborts the whole pack command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed ({code:#x}): {context}")]
pub struct HostError {
    /// Raw result code reported by the host.
    pub code: i32,
    /// Description of the failing call.
    pub context: String,
}

impl HostError {
    /// Creates a new host error.
    pub fn new(code: i32, context: impl Into<String>) -> Self {
        Self {
            code,
            context: context.into(),
        }
    }
}

/// Errors that can occur while packing UV islands.
#[derive(Debug, Error)]
pub enum Error {
    /// The packing operation was cancelled.
    #[error("Packing cancelled")]
    Cancelled,

    /// The islands do not fit into the packing box at a fixed scale.
    #[error("Not enough space to pack islands")]
    NoSpace,

    /// One or more islands were rejected by the packer.
    #[error("Invalid islands in input")]
    InvalidIslands,

    /// Packing to others was requested but no static island is valid.
    #[error("No valid static island")]
    NoValidStaticIsland,

    /// The packer returned a failure code with no dedicated variant.
    #[error("Packing failed with result code {0:?}")]
    PackFailed(ResultCode),

    /// The packer reported success but a required message never arrived.
    #[error("Packer did not send a {0:?} message")]
    MissingMessage(MessageKind),

    /// Operation input failed the engine's validation (debug builds only).
    #[error("Operation input validation failed: {0}")]
    Validation(String),

    /// The returned solution references islands or faces that do not exist.
    #[error("Malformed pack solution: {0}")]
    MalformedSolution(String),

    /// A vertex is reachable from faces of two different islands.
    #[error("Vertex {vertex} is shared by islands {first} and {second}")]
    SharedIslandVertex {
        /// Packer-vertex index.
        vertex: usize,
        /// Island that transformed the vertex first.
        first: usize,
        /// Island that tried to transform it again.
        second: usize,
    },

    /// The worker thread could not be started.
    #[error("Failed to spawn packing worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The worker thread panicked while running the engine.
    #[error("Packing worker panicked")]
    WorkerPanicked,

    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Command arguments could not be parsed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl Error {
    /// Returns the user-facing message key for this error, if it has one.
    ///
    /// Hosts look these keys up in their message tables.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Error::Cancelled => Some("pack.aborted"),
            Error::NoSpace => Some("pack.noSpace"),
            Error::InvalidIslands => Some("pack.invalidIslands"),
            Error::NoValidStaticIsland => Some("pack.noValidStaticIsland"),
            Error::PackFailed(_) | Error::Validation(_) => Some("pack.failed"),
            Error::MissingMessage(_) => Some("pack.messageNotFound"),
            _ => None,
        }
    }

    /// Returns true if the error came from a user abort.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
