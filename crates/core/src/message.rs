//! Messages emitted by the packing engine.
//!
//! The engine hands each message over by value. The executor keeps every
//! message it receives and remembers the latest one of each kind; they are
//! released together when the [`MessageStore`] is dropped.

use crate::types::IslandPackSolution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase tag of a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PackingPhase {
    /// Initial analysis of the face graph.
    TopologyAnalysis,
    /// Main packing pass.
    Packing,
    /// Refinement pass used when a pixel margin is set.
    PixelMarginAdjustment,
    /// Any phase the executor does not track.
    Other(u32),
}

/// A progress update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressReport {
    /// Phase the percentages belong to.
    pub phase: PackingPhase,
    /// Percentages in `0..=100`.
    pub progress: Vec<u32>,
}

impl ProgressReport {
    /// Creates a report with a single percentage.
    pub fn new(phase: PackingPhase, percent: u32) -> Self {
        Self {
            phase,
            progress: vec![percent],
        }
    }
}

/// Kind of a [`Message`], used to look up the latest message of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageKind {
    /// [`Message::ProgressReport`].
    ProgressReport,
    /// [`Message::Islands`].
    Islands,
    /// [`Message::PackSolution`].
    PackSolution,
    /// [`Message::InvalidIslands`].
    InvalidIslands,
}

impl MessageKind {
    /// Number of message kinds.
    pub const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            MessageKind::ProgressReport => 0,
            MessageKind::Islands => 1,
            MessageKind::PackSolution => 2,
            MessageKind::InvalidIslands => 3,
        }
    }
}

/// A message sent by the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// Progress of a phase.
    ProgressReport(ProgressReport),
    /// Islands found by the engine, each a list of face ids.
    Islands(Vec<Vec<usize>>),
    /// Transform parameters for the packed islands.
    PackSolution(Vec<IslandPackSolution>),
    /// Islands the engine rejected, each a list of face ids.
    InvalidIslands(Vec<Vec<usize>>),
}

impl Message {
    /// Returns the kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::ProgressReport(_) => MessageKind::ProgressReport,
            Message::Islands(_) => MessageKind::Islands,
            Message::PackSolution(_) => MessageKind::PackSolution,
            Message::InvalidIslands(_) => MessageKind::InvalidIslands,
        }
    }
}

/// Owner of every message received during one operation.
#[derive(Debug, Default)]
pub struct MessageStore {
    received: Vec<Message>,
    last: [Option<usize>; MessageKind::COUNT],
}

impl MessageStore {
    /// Takes ownership of a message and makes it the latest of its kind.
    pub fn push(&mut self, message: Message) {
        self.last[message.kind().index()] = Some(self.received.len());
        self.received.push(message);
    }

    /// Returns the most recent message of the given kind.
    pub fn last(&self, kind: MessageKind) -> Option<&Message> {
        self.last[kind.index()].map(|i| &self.received[i])
    }

    /// Number of messages received.
    pub fn len(&self) -> usize {
        self.received.len()
    }

    /// Returns true if no message was received.
    pub fn is_empty(&self) -> bool {
        self.received.is_empty()
    }

    /// Iterates over all received messages in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.received.iter()
    }

    /// Islands from the latest islands message.
    pub fn islands(&self) -> Option<&[Vec<usize>]> {
        match self.last(MessageKind::Islands) {
            Some(Message::Islands(islands)) => Some(islands),
            _ => None,
        }
    }

    /// Island solutions from the latest pack-solution message.
    pub fn pack_solution(&self) -> Option<&[IslandPackSolution]> {
        match self.last(MessageKind::PackSolution) {
            Some(Message::PackSolution(solutions)) => Some(solutions),
            _ => None,
        }
    }

    /// Islands from the latest invalid-islands message.
    pub fn invalid_islands(&self) -> Option<&[Vec<usize>]> {
        match self.last(MessageKind::InvalidIslands) {
            Some(Message::InvalidIslands(islands)) => Some(islands),
            _ => None,
        }
    }
}

impl Extend<Message> for MessageStore {
    fn extend<T: IntoIterator<Item = Message>>(&mut self, iter: T) {
        for message in iter {
            self.push(message);
        }
    }
}
