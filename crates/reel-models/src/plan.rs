//! Video plan and scene definitions.
//!
//! A plan is the ordered script the pipeline renders: a title plus one
//! scene per narration/visual unit. Scene order is the render order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Identifier for a scene, unique within a plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SceneId(pub u32);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plan validation error. Raised before a job is created.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid plan: {reason}")]
pub struct PlanError {
    pub reason: String,
}

impl PlanError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One narration + visual unit of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    /// Scene identifier, unique within the plan
    pub id: SceneId,

    /// Voice-over text spoken (and optionally captioned) for this scene
    #[serde(alias = "voice_off_text")]
    pub narration_text: String,

    /// Prompt describing the still image for this scene
    pub visual_prompt: String,

    /// Planning hint in seconds. The synthesized audio's duration is
    /// authoritative; this value is only used when narration is skipped
    /// or explicitly allowed as a fallback.
    #[serde(alias = "estimated_duration")]
    pub estimated_duration_seconds: f64,
}

impl Scene {
    /// Validate scene fields.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.narration_text.trim().is_empty() {
            return Err(PlanError::new(format!(
                "scene {} has empty narration text",
                self.id
            )));
        }
        if self.visual_prompt.trim().is_empty() {
            return Err(PlanError::new(format!(
                "scene {} has empty visual prompt",
                self.id
            )));
        }
        if !self.estimated_duration_seconds.is_finite() || self.estimated_duration_seconds <= 0.0 {
            return Err(PlanError::new(format!(
                "scene {} has non-positive duration hint",
                self.id
            )));
        }
        Ok(())
    }
}

/// An ordered script for one video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoPlan {
    /// Video title
    pub title: String,

    /// Scenes in render order
    pub scenes: Vec<Scene>,
}

impl VideoPlan {
    /// Validate the whole plan. Called synchronously at submission so a
    /// bad plan never creates a job.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.scenes.is_empty() {
            return Err(PlanError::new("plan has no scenes"));
        }

        let mut seen = HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.id) {
                return Err(PlanError::new(format!("duplicate scene id {}", scene.id)));
            }
            scene.validate()?;
        }

        Ok(())
    }

    /// Total of the per-scene duration hints, in seconds.
    pub fn estimated_duration(&self) -> f64 {
        self.scenes
            .iter()
            .map(|s| s.estimated_duration_seconds)
            .sum()
    }
}
