//! HTTP adapter for remote narration and image endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, warn};

use reel_models::{AudioAsset, ImageAsset};

use crate::client::{AssetClient, ImageRequest, NarrationRequest};
use crate::error::{AssetError, AssetResult};
use crate::wav::wav_duration_seconds;

/// Style suffix appended to every image prompt to steer the upstream
/// model towards the fixed vertical delivery format.
const IMAGE_PROMPT_SUFFIX: &str = ", vertical, 9:16, 4k, photorealistic, cinematic lighting";

/// Default per-request timeout. Free image endpoints can be slow.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default number of attempts per request.
const DEFAULT_ATTEMPTS: u32 = 3;
/// Pause between attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
}

/// Asset client backed by two HTTP endpoints:
///
/// - image: `GET {image_endpoint}?prompt=...&width=...&height=...`
///   returning raw image bytes
/// - narration: `POST {tts_endpoint}` with `{"text": ...}` returning
///   PCM WAV bytes; duration is measured from the returned file
///
/// Retryable upstream errors (timeouts, 5xx, 429) are retried a bounded
/// number of times with a fixed delay before the failure is surfaced.
pub struct HttpAssetClient {
    client: Client,
    image_endpoint: Url,
    tts_endpoint: Url,
    timeout: Duration,
    attempts: u32,
}

impl HttpAssetClient {
    /// Create a client for the given endpoints.
    pub fn new(image_endpoint: &str, tts_endpoint: &str) -> AssetResult<Self> {
        let image_endpoint = Url::parse(image_endpoint)
            .map_err(|e| AssetError::config(format!("bad image endpoint: {}", e)))?;
        let tts_endpoint = Url::parse(tts_endpoint)
            .map_err(|e| AssetError::config(format!("bad narration endpoint: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            image_endpoint,
            tts_endpoint,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the attempt budget per request.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    fn map_request_error(&self, err: reqwest::Error) -> AssetError {
        if err.is_timeout() {
            AssetError::Timeout(self.timeout.as_secs())
        } else {
            AssetError::Request(err)
        }
    }

    /// Run one request attempt, returning the response body on 200.
    async fn fetch_bytes(&self, build: impl Fn() -> reqwest::RequestBuilder) -> AssetResult<Vec<u8>> {
        let mut last_err = None;

        for attempt in 1..=self.attempts {
            let result = async {
                let response = build()
                    .timeout(self.timeout)
                    .send()
                    .await
                    .map_err(|e| self.map_request_error(e))?;

                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(AssetError::http(status.as_u16(), message));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| self.map_request_error(e))?;
                Ok(bytes.to_vec())
            }
            .await;

            match result {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    warn!(attempt, error = %e, "asset request failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // Unreachable: the loop always returns on the final attempt.
        Err(last_err.unwrap_or_else(|| AssetError::config("no attempts configured")))
    }
}

#[async_trait]
impl AssetClient for HttpAssetClient {
    async fn generate_narration(&self, request: &NarrationRequest) -> AssetResult<AudioAsset> {
        debug!(chars = request.text.len(), "requesting narration");

        let bytes = self
            .fetch_bytes(|| {
                self.client
                    .post(self.tts_endpoint.clone())
                    .json(&SpeechRequest { text: &request.text })
            })
            .await?;

        let duration_seconds = wav_duration_seconds(&bytes)?;
        debug!(duration_seconds, "narration received");

        Ok(AudioAsset {
            bytes,
            duration_seconds,
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> AssetResult<ImageAsset> {
        let mut url = self.image_endpoint.clone();
        let prompt = format!("{}{}", request.prompt, IMAGE_PROMPT_SUFFIX);
        url.query_pairs_mut()
            .append_pair("prompt", &prompt)
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string());

        debug!(prompt = %request.prompt, "requesting image");

        let bytes = self.fetch_bytes(|| self.client.get(url.clone())).await?;

        if bytes.is_empty() {
            return Err(AssetError::malformed_image("empty response body"));
        }

        Ok(ImageAsset { bytes })
    }
}
