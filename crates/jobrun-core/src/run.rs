//! Run payload types exchanged with the remote service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::RunId;
use crate::status::{classify, RunState};

/// Decoded payload of a triggered or polled run.
///
/// Fields the controller inspects (`id`, `status`, `finished_at`) are typed;
/// every other remote field is preserved verbatim in `extra` so the caller
/// sees the full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunData {
    /// Run identifier assigned by the service.
    pub id: RunId,

    /// Raw remote status code, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Completion timestamp; present only once the run is terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Remote fields the controller does not inspect.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunData {
    /// Interpret the raw status code and completion timestamp.
    ///
    /// A payload without a status code is classified as an unrecognized code
    /// (zero), which is never a terminal success or failure.
    pub fn state(&self) -> RunState {
        classify(self.status.unwrap_or(0), self.finished_at.as_ref())
    }
}

/// Handle returned immediately after triggering a run.
///
/// Owned by the orchestrator for the duration of one call; discarded once the
/// final result is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRunHandle {
    /// Identifier of the triggered run.
    pub run_id: RunId,

    /// Raw trigger response payload.
    pub data: RunData,
}

impl From<RunData> for JobRunHandle {
    fn from(data: RunData) -> Self {
        Self {
            run_id: data.id,
            data,
        }
    }
}

/// The decoded result of one status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatusSnapshot {
    /// Identifier of the polled run.
    pub run_id: RunId,

    /// Interpreted run state.
    pub state: RunState,

    /// Completion timestamp; present if and only if the state is terminal.
    pub finished_at: Option<DateTime<Utc>>,

    /// Full raw payload for pass-through to the caller.
    pub data: RunData,
}

impl RunStatusSnapshot {
    /// Decode a raw run payload into a snapshot.
    pub fn from_data(data: RunData) -> Self {
        Self {
            run_id: data.id,
            state: data.state(),
            finished_at: data.finished_at,
            data,
        }
    }

    /// Returns true if the run reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// A resolved, fetchable reference to one artifact produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReference {
    /// Artifact name as listed by the service.
    pub name: String,

    /// Constructed access location for the artifact.
    pub url: String,
}

/// Final payload returned to the caller after a trigger (and optional wait).
///
/// Serializes to the raw run payload, with `artifact_urls` attached only when
/// the wait-for-completion path ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Run payload: the trigger response, or the last snapshot when waiting.
    #[serde(flatten)]
    pub run: RunData,

    /// Resolved artifact URLs, in listing order. Present only after a
    /// successful wait; may be empty if the listing call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_urls: Option<Vec<String>>,
}
