//! The asset client trait and its request types.

use async_trait::async_trait;

use reel_models::{AudioAsset, ImageAsset, Scene};

use crate::error::AssetResult;

/// Narration synthesis request: text in, audio bytes + duration out.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub text: String,
}

impl NarrationRequest {
    pub fn for_scene(scene: &Scene) -> Self {
        Self {
            text: scene.narration_text.clone(),
        }
    }
}

/// Image synthesis request: prompt plus the fixed vertical target size.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

impl ImageRequest {
    pub fn for_scene(scene: &Scene, width: u32, height: u32) -> Self {
        Self {
            prompt: scene.visual_prompt.clone(),
            width,
            height,
        }
    }
}

/// Capability for producing one narration audio asset and one image
/// asset per scene.
///
/// Implementations must be safe to invoke concurrently for distinct
/// scenes and carry no side effects beyond the remote call. The returned
/// audio duration is authoritative for the scene's clip length.
#[async_trait]
pub trait AssetClient: Send + Sync {
    /// Synthesize narration audio for a scene.
    async fn generate_narration(&self, request: &NarrationRequest) -> AssetResult<AudioAsset>;

    /// Generate a still image for a scene, sized to at least the target
    /// dimensions.
    async fn generate_image(&self, request: &ImageRequest) -> AssetResult<ImageAsset>;
}
