//! Error types for the job-run client.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use jobrun_core::{CoreError, RunId, RunStatusSnapshot};

/// Details of a remote call that did not succeed: a transport failure, or a
/// response outside the 2xx range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,

    /// Transport error text, or the response body.
    pub message: String,
}

impl ApiFailure {
    /// Build a failure from an HTTP status and response body.
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub(crate) fn response(status: reqwest::StatusCode, body: String) -> Self {
        Self {
            status: Some(status.as_u16()),
            message: body,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors surfaced by the job-run client.
///
/// Everything propagates to the caller unmodified, with one exception:
/// `ListArtifactsFailed` is caught at the artifact-resolution boundary and
/// downgraded to a warning.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A mandatory input is missing; raised before any network call.
    #[error("missing configuration value: {field}")]
    Configuration { field: String },

    /// The create-job call returned a non-success result.
    #[error("create job failed: {0}")]
    CreateJobFailed(ApiFailure),

    /// The trigger-run call returned a non-success result.
    #[error("trigger run failed: {0}")]
    TriggerRunFailed(ApiFailure),

    /// A get-run call returned a non-success result.
    #[error("get run failed: {0}")]
    GetRunFailed(ApiFailure),

    /// The artifact listing call returned a non-success result.
    #[error("list run artifacts failed: {0}")]
    ListArtifactsFailed(ApiFailure),

    /// The run reached a failed terminal state.
    #[error("run {} reached a failed state", .snapshot.run_id)]
    RunFailed { snapshot: RunStatusSnapshot },

    /// The run was canceled before completing.
    #[error("run {} was canceled", .snapshot.run_id)]
    RunCanceled { snapshot: RunStatusSnapshot },

    /// The wait deadline expired while the run was still non-terminal.
    #[error("run {run_id} did not finish within {waited:?}")]
    RunTimedOut { run_id: RunId, waited: Duration },

    /// The run finished but its status code is unrecognized.
    #[error("run {} finished with unrecognized status code {code}", .snapshot.run_id)]
    RunUnknownState {
        snapshot: RunStatusSnapshot,
        code: i64,
    },
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingValue(field) => Self::Configuration {
                field: field.to_string(),
            },
        }
    }
}
