//! Asset client configuration and selection.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::client::AssetClient;
use crate::error::AssetResult;
use crate::http::HttpAssetClient;
use crate::mock::MockAssetClient;

/// Asset client configuration.
///
/// When both endpoints are set the HTTP client is used; otherwise the
/// deterministic mock client stands in. The choice is made once at
/// startup so the pipeline itself stays provider-agnostic.
#[derive(Debug, Clone, Default)]
pub struct AssetConfig {
    /// Image generation endpoint (GET, prompt/width/height query params)
    pub image_endpoint: Option<String>,
    /// Narration synthesis endpoint (POST JSON, WAV response)
    pub tts_endpoint: Option<String>,
    /// Per-request timeout override in seconds
    pub timeout_secs: Option<u64>,
    /// Attempt budget override per request
    pub attempts: Option<u32>,
}

impl AssetConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            image_endpoint: std::env::var("REEL_IMAGE_ENDPOINT").ok(),
            tts_endpoint: std::env::var("REEL_TTS_ENDPOINT").ok(),
            timeout_secs: std::env::var("REEL_ASSET_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            attempts: std::env::var("REEL_ASSET_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Build the configured asset client.
    pub fn build(&self) -> AssetResult<Arc<dyn AssetClient>> {
        match (&self.image_endpoint, &self.tts_endpoint) {
            (Some(image), Some(tts)) => {
                let mut client = HttpAssetClient::new(image, tts)?;
                if let Some(secs) = self.timeout_secs {
                    client = client.with_timeout(Duration::from_secs(secs));
                }
                if let Some(attempts) = self.attempts {
                    client = client.with_attempts(attempts);
                }
                info!("using HTTP asset client");
                Ok(Arc::new(client))
            }
            _ => {
                info!("no asset endpoints configured, using mock asset client");
                Ok(Arc::new(MockAssetClient::new()))
            }
        }
    }
}
