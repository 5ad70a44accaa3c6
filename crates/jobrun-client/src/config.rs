//! Credential and identifier resolution.
//!
//! Every value resolves through an explicit, ordered chain: explicit
//! parameter, then a named environment variable, then a configuration error
//! naming what is missing. No other module reads the environment.

use std::env;

use jobrun_core::{AccountId, JobId};

use crate::error::ClientError;

/// API domain used when the caller supplies none.
pub const DEFAULT_API_DOMAIN: &str = "cloud.jobrun.dev";

/// Default environment variable holding the account identifier.
pub const ACCOUNT_ID_ENV: &str = "JOBRUN_ACCOUNT_ID";

/// Default environment variable holding the job identifier.
pub const JOB_ID_ENV: &str = "JOBRUN_JOB_ID";

/// Default environment variable holding the API token.
pub const TOKEN_ENV: &str = "JOBRUN_TOKEN";

/// Caller-supplied configuration for the orchestrator operations.
///
/// All fields are optional; resolution falls back to the named environment
/// variables. The variable names themselves can be overridden, mirroring the
/// explicit-then-environment chain per value.
#[derive(Debug, Clone, Default)]
pub struct JobRunConfig {
    /// Account identifier, if supplied directly.
    pub account_id: Option<u64>,

    /// Job identifier, if supplied directly. Required for `run_job` only.
    pub job_id: Option<u64>,

    /// API token, if supplied directly.
    pub token: Option<String>,

    /// API domain; [`DEFAULT_API_DOMAIN`] when absent.
    pub api_domain: Option<String>,

    /// Override for the account id environment variable name.
    pub account_id_env: Option<String>,

    /// Override for the job id environment variable name.
    pub job_id_env: Option<String>,

    /// Override for the token environment variable name.
    pub token_env: Option<String>,
}

impl JobRunConfig {
    /// Create an empty configuration (everything resolved from environment).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the account identifier.
    pub fn with_account_id(mut self, id: u64) -> Self {
        self.account_id = Some(id);
        self
    }

    /// Builder method to set the job identifier.
    pub fn with_job_id(mut self, id: u64) -> Self {
        self.job_id = Some(id);
        self
    }

    /// Builder method to set the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builder method to set the API domain.
    pub fn with_api_domain(mut self, domain: impl Into<String>) -> Self {
        self.api_domain = Some(domain.into());
        self
    }

    /// Builder method to rename the account id fallback variable.
    pub fn with_account_id_env(mut self, name: impl Into<String>) -> Self {
        self.account_id_env = Some(name.into());
        self
    }

    /// Builder method to rename the job id fallback variable.
    pub fn with_job_id_env(mut self, name: impl Into<String>) -> Self {
        self.job_id_env = Some(name.into());
        self
    }

    /// Builder method to rename the token fallback variable.
    pub fn with_token_env(mut self, name: impl Into<String>) -> Self {
        self.token_env = Some(name.into());
        self
    }

    /// Resolve the account identifier.
    pub fn resolve_account_id(&self) -> Result<AccountId, ClientError> {
        let var = self.account_id_env.as_deref().unwrap_or(ACCOUNT_ID_ENV);
        resolve_numeric(self.account_id, var, "account id").map(AccountId::new)
    }

    /// Resolve the job identifier.
    pub fn resolve_job_id(&self) -> Result<JobId, ClientError> {
        let var = self.job_id_env.as_deref().unwrap_or(JOB_ID_ENV);
        resolve_numeric(self.job_id, var, "job id").map(JobId::new)
    }

    /// Resolve the API token.
    pub fn resolve_token(&self) -> Result<String, ClientError> {
        let var = self.token_env.as_deref().unwrap_or(TOKEN_ENV);
        match self.token.clone().or_else(|| env_lookup(var)) {
            Some(token) => Ok(token),
            None => Err(missing("token", var)),
        }
    }

    /// The API domain to call, defaulting to [`DEFAULT_API_DOMAIN`].
    pub fn resolve_api_domain(&self) -> &str {
        self.api_domain.as_deref().unwrap_or(DEFAULT_API_DOMAIN)
    }
}

/// Read a variable, treating empty values as absent.
fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn resolve_numeric(
    explicit: Option<u64>,
    var: &str,
    field: &str,
) -> Result<u64, ClientError> {
    if let Some(value) = explicit {
        return Ok(value);
    }
    match env_lookup(var) {
        Some(raw) => raw.parse::<u64>().map_err(|_| ClientError::Configuration {
            field: format!("{field} (env {var} is not a number)"),
        }),
        None => Err(missing(field, var)),
    }
}

fn missing(field: &str, var: &str) -> ClientError {
    ClientError::Configuration {
        field: format!("{field} (pass it directly or set {var})"),
    }
}
