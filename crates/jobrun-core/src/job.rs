//! Job definition and created-job types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::ids::{EnvironmentId, JobId, ProjectId};

/// Configuration for creating a new job on the remote service.
///
/// Write-once: built by the caller, validated, sent as the create-job body,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Human-readable job name.
    pub name: String,

    /// Project the job is created in.
    pub project_id: ProjectId,

    /// Environment the job runs in.
    pub environment_id: EnvironmentId,

    /// Commands the job executes, in order.
    pub execute_steps: Vec<String>,

    /// Runtime version override; uses the environment default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    /// Trigger types enabled for the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Value>,

    /// Settings applied to the job when running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    /// Whether to generate documentation after the job has executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_docs: Option<bool>,

    /// Run schedule specification for the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Value>,
}

impl JobDefinition {
    /// Create a definition with the mandatory fields.
    pub fn new(
        name: impl Into<String>,
        project_id: ProjectId,
        environment_id: EnvironmentId,
        execute_steps: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            project_id,
            environment_id,
            execute_steps,
            runtime_version: None,
            triggers: None,
            settings: None,
            generate_docs: None,
            schedule: None,
        }
    }

    /// Builder method to set the runtime version override.
    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    /// Builder method to set the trigger object.
    pub fn with_triggers(mut self, triggers: Value) -> Self {
        self.triggers = Some(triggers);
        self
    }

    /// Builder method to set the settings object.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Builder method to enable documentation generation.
    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = Some(generate);
        self
    }

    /// Builder method to set the run schedule.
    pub fn with_schedule(mut self, schedule: Value) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Check that all mandatory fields are present and non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingValue("job name"));
        }
        if self.execute_steps.is_empty() {
            return Err(CoreError::MissingValue("execute steps"));
        }
        if self.project_id.as_u64() == 0 {
            return Err(CoreError::MissingValue("project id"));
        }
        if self.environment_id.as_u64() == 0 {
            return Err(CoreError::MissingValue("environment id"));
        }
        Ok(())
    }
}

/// A created job as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job identifier assigned by the service.
    pub id: JobId,

    /// Remaining remote fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
