//! Authenticated HTTP client for the remote job-run API.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use jobrun_core::{
    AccountId, JobDefinition, JobId, JobRecord, JobRunHandle, RunData, RunId, RunStatusSnapshot,
};

use crate::error::{ApiFailure, ClientError};
use crate::service::JobService;

/// Identifying client header sent with every request.
const CLIENT_USER_AGENT: &str = concat!("jobrun/", env!("CARGO_PKG_VERSION"));

/// Success envelope wrapping every response body.
#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client for the job-run service, scoped to one account.
///
/// Performs exactly four remote operations, each a single authenticated call.
/// Holds no state between calls; retry policy belongs to the caller.
pub struct CloudClient {
    inner: reqwest::Client,
    base_url: String,
    token: String,
}

impl CloudClient {
    /// Create a client for `https://{api_domain}`.
    pub fn new(account_id: AccountId, token: impl Into<String>, api_domain: &str) -> Self {
        Self::with_root_url(format!("https://{}", api_domain), account_id, token)
    }

    /// Create a client against an explicit root URL (scheme included).
    ///
    /// Used by tests to point at a local server; also usable behind proxies.
    pub fn with_root_url(
        root_url: impl Into<String>,
        account_id: AccountId,
        token: impl Into<String>,
    ) -> Self {
        let root = root_url.into();
        Self {
            inner: reqwest::Client::new(),
            base_url: format!("{}/accounts/{}", root.trim_end_matches('/'), account_id),
            token: token.into(),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner
            .request(method, url)
            .bearer_auth(&self.token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    async fn get_json<T, E>(&self, url: &str, wrap: E) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        E: Fn(ApiFailure) -> ClientError,
    {
        debug!(url = %url, "GET request");
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| wrap(ApiFailure::transport(e)))?;
        Self::decode(response, wrap).await
    }

    async fn post_json<T, E>(&self, url: &str, body: &Value, wrap: E) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        E: Fn(ApiFailure) -> ClientError,
    {
        debug!(url = %url, "POST request");
        let response = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(ApiFailure::transport(e)))?;
        Self::decode(response, wrap).await
    }

    async fn decode<T, E>(response: Response, wrap: E) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        E: Fn(ApiFailure) -> ClientError,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(wrap(ApiFailure::response(status, body)));
        }
        response
            .json::<Envelope<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|e| wrap(ApiFailure::transport(e)))
    }
}

#[async_trait]
impl JobService for CloudClient {
    async fn create_job(&self, definition: &JobDefinition) -> Result<JobRecord, ClientError> {
        let url = format!("{}/jobs/", self.base_url);
        let body = serde_json::to_value(definition)
            .map_err(|e| ClientError::CreateJobFailed(ApiFailure::new(None, e.to_string())))?;
        self.post_json(&url, &body, ClientError::CreateJobFailed)
            .await
    }

    async fn trigger_run(
        &self,
        job_id: JobId,
        cause: &str,
        extra_args: Option<&Map<String, Value>>,
    ) -> Result<JobRunHandle, ClientError> {
        let url = format!("{}/jobs/{}/run/", self.base_url, job_id);
        let mut body = Map::new();
        body.insert("cause".to_string(), Value::String(cause.to_string()));
        if let Some(extra) = extra_args {
            for (key, value) in extra {
                body.insert(key.clone(), value.clone());
            }
        }
        let data: RunData = self
            .post_json(&url, &Value::Object(body), ClientError::TriggerRunFailed)
            .await?;
        Ok(JobRunHandle::from(data))
    }

    async fn get_run(&self, run_id: RunId) -> Result<RunStatusSnapshot, ClientError> {
        let url = format!("{}/runs/{}/", self.base_url, run_id);
        let data: RunData = self.get_json(&url, ClientError::GetRunFailed).await?;
        Ok(RunStatusSnapshot::from_data(data))
    }

    async fn list_run_artifacts(&self, run_id: RunId) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/runs/{}/artifacts/", self.base_url, run_id);
        self.get_json(&url, ClientError::ListArtifactsFailed).await
    }

    fn artifact_url(&self, run_id: RunId, name: &str) -> String {
        format!("{}/runs/{}/artifacts/{}", self.base_url, run_id, name)
    }
}
