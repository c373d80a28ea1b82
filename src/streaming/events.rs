//! Stream events and terminal outcomes

use crate::error::WikiError;

/// One item of a [`FragmentStream`](super::FragmentStream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental, non-empty piece of generated text
    Fragment(String),
    /// End of stream or the termination sentinel; always the last item
    Completed,
}

/// How one invocation ended. Exactly one is produced per stream.
#[derive(Debug)]
pub enum Outcome {
    /// The server finished the stream
    Completed,
    /// The caller cancelled; no completion or error callback fired
    Aborted,
    /// Transport or protocol failure, already reported to the error callback
    Failed(WikiError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&WikiError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
