//! jobrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtime
//! - Environment lookup
//!
//! All types here represent payloads and states of the remote job-run
//! service, decoded into a fully typed form while preserving unknown
//! remote fields for pass-through to the caller.

pub mod error;
pub mod ids;
pub mod job;
pub mod run;
pub mod status;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::{AccountId, EnvironmentId, JobId, ProjectId, RunId};
pub use job::{JobDefinition, JobRecord};
pub use run::{ArtifactReference, JobRunHandle, RunData, RunResult, RunStatusSnapshot};
pub use status::{classify, RunState};
