//! Engine result codes and operation output.

use crate::error::{Error, Result};
use crate::message::{MessageKind, MessageStore};
use crate::types::IslandPackSolution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result code returned by a packing engine when an operation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResultCode {
    /// The operation completed.
    Success,
    /// The operation observed a cancel request.
    Cancelled,
    /// Islands do not fit into the packing box.
    NoSpace,
    /// The input contains islands the packer cannot process.
    InvalidIslands,
    /// No static island is valid when packing to others.
    NoValidStaticIsland,
    /// Unspecified engine failure.
    #[default]
    GeneralError,
    /// A code this crate does not know about.
    Unknown(i32),
}

impl ResultCode {
    /// Converts the code into a `Result`, mapping every failure code to its
    /// matching error.
    pub fn check(self) -> Result<()> {
        match self {
            ResultCode::Success => Ok(()),
            ResultCode::Cancelled => Err(Error::Cancelled),
            ResultCode::NoSpace => Err(Error::NoSpace),
            ResultCode::InvalidIslands => Err(Error::InvalidIslands),
            ResultCode::NoValidStaticIsland => Err(Error::NoValidStaticIsland),
            code @ (ResultCode::GeneralError | ResultCode::Unknown(_)) => {
                Err(Error::PackFailed(code))
            }
        }
    }

    /// Returns true for [`ResultCode::Success`].
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }
}

/// Everything a finished operation produced.
#[derive(Debug)]
pub struct OperationOutput {
    /// Result code returned by the engine.
    pub code: ResultCode,

    /// Messages received during the operation.
    pub messages: MessageStore,

    /// Wall-clock time spent in the worker in milliseconds.
    pub computation_time_ms: u64,
}

impl OperationOutput {
    /// Checks the result code and returns the island list together with the
    /// pack solution.
    ///
    /// A successful code is not enough: both the islands message and the
    /// pack-solution message must have been received.
    pub fn solution(&self) -> Result<(&[Vec<usize>], &[IslandPackSolution])> {
        self.code.check()?;

        let islands = self
            .messages
            .islands()
            .ok_or(Error::MissingMessage(MessageKind::Islands))?;
        let solutions = self
            .messages
            .pack_solution()
            .ok_or(Error::MissingMessage(MessageKind::PackSolution))?;

        Ok((islands, solutions))
    }
}
