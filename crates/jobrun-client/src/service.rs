//! Remote-operation seam used by the wait loop and artifact resolution.

use async_trait::async_trait;
use serde_json::{Map, Value};

use jobrun_core::{JobDefinition, JobId, JobRecord, JobRunHandle, RunId, RunStatusSnapshot};

use crate::error::ClientError;

/// The four remote operations of the job-run service.
///
/// Implemented over HTTP by [`crate::http::CloudClient`]; the seam exists so
/// the polling loop and artifact resolution can be driven by a scripted
/// implementation in tests.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Create a job definition. Not retried: creation is not idempotent.
    async fn create_job(&self, definition: &JobDefinition) -> Result<JobRecord, ClientError>;

    /// Trigger one run of a job.
    async fn trigger_run(
        &self,
        job_id: JobId,
        cause: &str,
        extra_args: Option<&Map<String, Value>>,
    ) -> Result<JobRunHandle, ClientError>;

    /// Fetch the current status of a run. Idempotent; safe to call repeatedly.
    async fn get_run(&self, run_id: RunId) -> Result<RunStatusSnapshot, ClientError>;

    /// List names of artifacts produced by a run.
    ///
    /// Independently failable from [`Self::get_run`]; callers decide whether a
    /// failure here may mask an already-decided run outcome.
    async fn list_run_artifacts(&self, run_id: RunId) -> Result<Vec<String>, ClientError>;

    /// Resolved fetchable URL for one artifact of a run.
    fn artifact_url(&self, run_id: RunId, name: &str) -> String;
}
