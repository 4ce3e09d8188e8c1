//! Job definitions and lifecycle.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::asset::RenderOptions;
use crate::plan::VideoPlan;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle state.
///
/// `Pending -> Running -> Succeeded | Failed`; terminal states never
/// transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job accepted, run not yet started
    #[default]
    Pending,
    /// Pipeline run in progress
    Running,
    /// Output rendered and published
    Succeeded,
    /// Run aborted; failure reason recorded
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// One asynchronous end-to-end pipeline run for a submitted plan.
///
/// The plan and options are an immutable snapshot taken at submission.
/// Only the owning run mutates the job; once terminal it is read-only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Job state
    #[serde(default)]
    pub state: JobState,

    /// Plan snapshot taken at submission
    pub plan: VideoPlan,

    /// Render options snapshot taken at submission
    pub options: RenderOptions,

    /// Path of the rendered output (present only when Succeeded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Failure reason (present only when Failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Started at timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Finished at timestamp (terminal states only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new pending job for a validated plan.
    pub fn new(plan: VideoPlan, options: RenderOptions) -> Self {
        Self {
            id: JobId::new(),
            state: JobState::Pending,
            plan,
            options,
            output_path: None,
            failure_reason: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Mark the run as started. No-op once terminal.
    pub fn start(mut self) -> Self {
        if self.state.is_terminal() {
            return self;
        }
        self.state = JobState::Running;
        self.started_at = Some(Utc::now());
        self
    }

    /// Mark the job as succeeded with its output path. No-op once terminal.
    pub fn succeed(mut self, output_path: PathBuf) -> Self {
        if self.state.is_terminal() {
            return self;
        }
        self.state = JobState::Succeeded;
        self.output_path = Some(output_path);
        self.finished_at = Some(Utc::now());
        self
    }

    /// Mark the job as failed with a reason. No-op once terminal.
    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        if self.state.is_terminal() {
            return self;
        }
        self.state = JobState::Failed;
        self.failure_reason = Some(reason.into());
        self.finished_at = Some(Utc::now());
        self
    }
}
