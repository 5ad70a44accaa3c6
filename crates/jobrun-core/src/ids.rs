//! Newtype wrappers for service-assigned identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    /// Create a new AccountId.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a job definition on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Create a new JobId.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of one run of a job, assigned by the service when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    /// Create a new RunId.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RunId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a project a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Create a new ProjectId.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the execution environment a job runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(u64);

impl EnvironmentId {
    /// Create a new EnvironmentId.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EnvironmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
