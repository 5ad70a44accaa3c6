//! Run status interpretation.
//!
//! The remote service reports run status as an integer code together with a
//! completion timestamp that appears only once the run is terminal. This
//! module is the only place those codes are decoded.

use chrono::{DateTime, Utc};

/// Remote status code for a run that finished successfully.
pub const STATUS_SUCCEEDED: i64 = 10;

/// Remote status code for a run that finished with an error.
pub const STATUS_FAILED: i64 = 20;

/// Remote status code for a run that was canceled.
pub const STATUS_CANCELED: i64 = 30;

/// Interpreted state of a remote run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Run is queued or executing; no completion timestamp yet.
    Running,
    /// Run finished successfully.
    Succeeded,
    /// Run finished with an error.
    Failed,
    /// Run was canceled.
    Canceled,
    /// Completion timestamp present but the status code is not one we know.
    /// Never coerced to success or failure.
    UnknownTerminal(i64),
}

impl RunState {
    /// Returns true if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Classify a raw remote status code and completion timestamp into a [`RunState`].
///
/// Deterministic and total: an absent timestamp always means [`RunState::Running`]
/// regardless of code; a present timestamp with an unrecognized code yields
/// [`RunState::UnknownTerminal`].
pub fn classify(status_code: i64, finished_at: Option<&DateTime<Utc>>) -> RunState {
    if finished_at.is_none() {
        return RunState::Running;
    }
    match status_code {
        STATUS_SUCCEEDED => RunState::Succeeded,
        STATUS_FAILED => RunState::Failed,
        STATUS_CANCELED => RunState::Canceled,
        other => RunState::UnknownTerminal(other),
    }
}
