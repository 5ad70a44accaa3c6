//! Caller-facing operations: create a job, trigger a run and optionally wait.

use serde_json::{Map, Value};
use tracing::info;

use jobrun_core::{JobDefinition, JobId, JobRecord, RunResult};

use crate::artifacts::resolve_artifacts;
use crate::config::JobRunConfig;
use crate::error::ClientError;
use crate::http::CloudClient;
use crate::service::JobService;
use crate::wait::{wait_for_run, WaitOptions};

/// Options controlling [`run_job`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Extra parameters merged into the trigger request body.
    pub extra_args: Option<Map<String, Value>>,

    /// Whether to poll the run to completion before returning.
    pub wait_for_completion: bool,

    /// Wait-loop parameters, used only when waiting.
    pub wait: WaitOptions,
}

impl RunOptions {
    /// Trigger-and-return: no waiting, no extra arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add one extra trigger argument.
    pub fn with_extra_arg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_args
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Builder method to poll the run to completion.
    pub fn wait_for_completion(mut self) -> Self {
        self.wait_for_completion = true;
        self
    }

    /// Builder method to bound the wait time. Implies waiting.
    pub fn with_max_wait(mut self, max_wait: std::time::Duration) -> Self {
        self.wait_for_completion = true;
        self.wait.max_wait = Some(max_wait);
        self
    }

    /// Builder method to change the poll cadence.
    pub fn with_poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.wait.poll_interval = interval;
        self
    }
}

/// Create a job on the remote service.
///
/// Validates the definition and resolves credentials before any network call;
/// a missing value fails with `Configuration` naming it.
pub async fn create_job(
    config: &JobRunConfig,
    definition: &JobDefinition,
) -> Result<JobRecord, ClientError> {
    definition.validate()?;
    let account_id = config.resolve_account_id()?;
    let token = config.resolve_token()?;
    let client = CloudClient::new(account_id, token, config.resolve_api_domain());
    client.create_job(definition).await
}

/// Trigger a run of a job and, optionally, wait for it to complete.
///
/// Without waiting, the trigger response payload is returned unmodified. With
/// waiting, the final snapshot payload is returned with `artifact_urls`
/// attached (possibly empty); any wait-loop failure propagates untouched and
/// artifacts are never attempted for a non-successful run.
pub async fn run_job(
    config: &JobRunConfig,
    cause: &str,
    options: &RunOptions,
) -> Result<RunResult, ClientError> {
    if cause.trim().is_empty() {
        return Err(ClientError::Configuration {
            field: "cause".to_string(),
        });
    }
    let account_id = config.resolve_account_id()?;
    let job_id = config.resolve_job_id()?;
    let token = config.resolve_token()?;
    let client = CloudClient::new(account_id, token, config.resolve_api_domain());
    run_job_with(&client, job_id, cause, options).await
}

/// Same as [`run_job`], over an already-built service.
pub async fn run_job_with<S>(
    service: &S,
    job_id: JobId,
    cause: &str,
    options: &RunOptions,
) -> Result<RunResult, ClientError>
where
    S: JobService + ?Sized,
{
    let handle = service
        .trigger_run(job_id, cause, options.extra_args.as_ref())
        .await?;
    info!(job_id = %job_id, run_id = %handle.run_id, "Triggered job run");

    if !options.wait_for_completion {
        return Ok(RunResult {
            run: handle.data,
            artifact_urls: None,
        });
    }

    let snapshot = wait_for_run(service, handle.run_id, &options.wait).await?;
    let artifacts = resolve_artifacts(service, handle.run_id).await;
    Ok(RunResult {
        run: snapshot.data,
        artifact_urls: Some(artifacts.into_iter().map(|a| a.url).collect()),
    })
}
