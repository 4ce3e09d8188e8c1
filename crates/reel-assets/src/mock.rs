//! Deterministic offline asset client.

use async_trait::async_trait;
use tracing::debug;

use reel_models::{AudioAsset, ImageAsset};

use crate::client::{AssetClient, ImageRequest, NarrationRequest};
use crate::error::AssetResult;
use crate::placeholder::placeholder_image;
use crate::wav::{silent_wav, wav_duration_seconds};

/// Speaking rate used to size mock narration, in words per second.
const MOCK_WORDS_PER_SECOND: f64 = 2.5;

/// Asset client that synthesizes everything locally.
///
/// Selected when no upstream endpoints are configured. Output is fully
/// deterministic per request: narration is a silent WAV sized from the
/// text's word count, images are hash-tinted placeholders. Useful for
/// development and as the test double for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MockAssetClient;

impl MockAssetClient {
    pub fn new() -> Self {
        Self
    }

    /// Narration length the mock will produce for a text.
    pub fn narration_duration(text: &str) -> f64 {
        let words = text.split_whitespace().count();
        (words as f64 / MOCK_WORDS_PER_SECOND).max(1.0)
    }
}

#[async_trait]
impl AssetClient for MockAssetClient {
    async fn generate_narration(&self, request: &NarrationRequest) -> AssetResult<AudioAsset> {
        let duration = Self::narration_duration(&request.text);
        let bytes = silent_wav(duration)?;
        // Measure back from the file so the reported duration matches
        // what any probe of the bytes would see.
        let duration_seconds = wav_duration_seconds(&bytes)?;

        debug!(
            words = request.text.split_whitespace().count(),
            duration_seconds, "mock narration synthesized"
        );

        Ok(AudioAsset {
            bytes,
            duration_seconds,
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> AssetResult<ImageAsset> {
        debug!(prompt = %request.prompt, "mock image rendered");
        placeholder_image(&request.prompt, request.width, request.height)
    }
}
