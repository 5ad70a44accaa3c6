//! Client-side lifecycle controller for remote job runs.
//!
//! This crate triggers jobs on a remote job-run service, polls run status
//! under a bounded time budget, interprets the remote status codes into a
//! local outcome, and best-effort collects artifact references after a
//! successful run.
//!
//! The caller-facing surface is [`create_job`] and [`run_job`], which resolve
//! credentials through an explicit chain (parameter, then environment
//! variable, then error) before any network call is made.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod http;
pub mod run;
pub mod service;
pub mod wait;

// Re-export commonly used types
pub use config::{JobRunConfig, DEFAULT_API_DOMAIN};
pub use error::{ApiFailure, ClientError};
pub use http::CloudClient;
pub use run::{create_job, run_job, run_job_with, RunOptions};
pub use service::JobService;
pub use wait::{wait_for_run, WaitOptions, DEFAULT_POLL_INTERVAL};
