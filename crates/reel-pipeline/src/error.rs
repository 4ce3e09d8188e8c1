//! Pipeline error taxonomy.
//!
//! Per-scene failures (`AssetGenerationFailed`, `CompositionFailed`)
//! carry the scene they belong to; stage-level failures do not. The job
//! keeps the first failure encountered as its reported reason.

use thiserror::Error;

use reel_assets::AssetError;
use reel_media::MediaError;
use reel_models::{AssetKind, JobId, PlanError, SceneId};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected at submission, before a job exists.
    #[error("{0}")]
    InvalidPlan(#[from] PlanError),

    /// Upstream-caused per-scene failure.
    #[error("asset generation failed for scene {scene_id} ({} asset): {source}", kind.as_str())]
    AssetGenerationFailed {
        scene_id: SceneId,
        kind: AssetKind,
        #[source]
        source: AssetError,
    },

    /// Per-scene failure while building the clip.
    #[error("composition failed for scene {scene_id}: {source}")]
    CompositionFailed {
        scene_id: SceneId,
        #[source]
        source: MediaError,
    },

    /// Timeline-level failure.
    #[error("concatenation failed: {source}")]
    ConcatenationFailed {
        #[source]
        source: MediaError,
    },

    /// Output-level failure; always fatal for the job.
    #[error("encoding failed: {source}")]
    EncodingFailed {
        #[source]
        source: MediaError,
    },

    /// Lookup for an identifier no job was ever created under.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The run observed its cancellation signal.
    #[error("job cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn asset_failed(scene_id: SceneId, kind: AssetKind, source: AssetError) -> Self {
        Self::AssetGenerationFailed {
            scene_id,
            kind,
            source,
        }
    }

    /// Wrap a composition-stage media error, keeping cancellation distinct.
    pub fn composition_failed(scene_id: SceneId, source: MediaError) -> Self {
        match source {
            MediaError::Cancelled => Self::Cancelled,
            source => Self::CompositionFailed { scene_id, source },
        }
    }

    pub fn concatenation_failed(source: MediaError) -> Self {
        match source {
            MediaError::Cancelled => Self::Cancelled,
            source => Self::ConcatenationFailed { source },
        }
    }

    pub fn encoding_failed(source: MediaError) -> Self {
        match source {
            MediaError::Cancelled => Self::Cancelled,
            source => Self::EncodingFailed { source },
        }
    }

    /// Whether this error names a specific scene.
    pub fn scene_id(&self) -> Option<SceneId> {
        match self {
            PipelineError::AssetGenerationFailed { scene_id, .. }
            | PipelineError::CompositionFailed { scene_id, .. } => Some(*scene_id),
            _ => None,
        }
    }
}
