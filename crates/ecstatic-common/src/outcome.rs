//! Result of one agent update request

use std::fmt;

/// Typed result of an `UpdateContainerAgent` call.
///
/// The control plane reports collisions and no-op updates as service
/// exceptions; the adapter folds them into these variants so callers can
/// switch on them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update was accepted
    Requested,
    /// An update is already running on the instance
    AlreadyInProgress,
    /// The agent is already on the latest version
    NoUpdateAvailable,
    /// Any other failure, with the full error detail
    UnexpectedError(String),
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("requested"),
            Self::AlreadyInProgress => f.write_str("already in progress"),
            Self::NoUpdateAvailable => f.write_str("no update available"),
            Self::UnexpectedError(detail) => write!(f, "unexpected error: {detail}"),
        }
    }
}
