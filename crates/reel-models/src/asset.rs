//! Generated assets, composed clips, and timelines.
//!
//! Assets are transient working data: produced by an asset client, owned
//! by the composition step that requested them, dropped once the scene
//! clip is on disk. Only `RenderOptions` travels on the wire.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plan::SceneId;

/// Kind of generated asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Audio,
    Image,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Audio => "audio",
            AssetKind::Image => "image",
        }
    }
}

/// A synthesized narration track for one scene.
///
/// `duration_seconds` is measured from the actual audio and is the
/// authoritative length for the scene's clip.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub duration_seconds: f64,
}

/// A generated still image for one scene.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
}

/// Per-submission rendering switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct RenderOptions {
    /// Synthesize and attach narration audio
    #[serde(default = "default_true")]
    pub include_voice: bool,

    /// Burn the narration text into each scene as a static caption
    #[serde(default = "default_true")]
    pub include_subtitles: bool,

    /// On image generation failure, substitute a deterministic
    /// placeholder instead of failing the job
    #[serde(default)]
    pub allow_placeholder_image: bool,

    /// On narration failure, fall back to a silent clip of the scene's
    /// estimated duration instead of failing the job
    #[serde(default)]
    pub allow_estimated_duration: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_voice: true,
            include_subtitles: true,
            allow_placeholder_image: false,
            allow_estimated_duration: false,
        }
    }
}

/// One scene rendered into a timed audio+visual unit on disk.
#[derive(Debug, Clone)]
pub struct ComposedClip {
    pub scene_id: SceneId,
    pub path: PathBuf,
    /// Equals the audio duration the clip was built from
    pub duration_seconds: f64,
}

/// The ordered concatenation of all composed clips for a plan.
///
/// Order is exactly the submitted clip order; the timeline is never
/// reordered.
#[derive(Debug, Clone)]
pub struct Timeline {
    clips: Vec<ComposedClip>,
}

impl Timeline {
    /// Build a timeline from ordered clips. The caller guarantees the
    /// list is non-empty and in scene order.
    pub fn new(clips: Vec<ComposedClip>) -> Self {
        Self { clips }
    }

    pub fn clips(&self) -> &[ComposedClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of clip durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_seconds).sum()
    }
}
