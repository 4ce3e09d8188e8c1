//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use reel_models::EncodingConfig;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum scenes generating assets in parallel within a job
    pub max_scene_parallel: usize,
    /// Timeout for each asset-generation call
    pub asset_timeout: Duration,
    /// Timeout for each per-scene ffmpeg composition
    pub compose_timeout: Duration,
    /// Timeout for the final encode
    pub encode_timeout: Duration,
    /// Scratch directory for per-job working files
    pub work_dir: PathBuf,
    /// Directory rendered outputs are published into
    pub output_dir: PathBuf,
    /// Output encoding profile
    pub encoding: EncodingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_scene_parallel: 3,
            asset_timeout: Duration::from_secs(90),
            compose_timeout: Duration::from_secs(120),
            encode_timeout: Duration::from_secs(600),
            work_dir: std::env::temp_dir().join("reelpipe"),
            output_dir: PathBuf::from("outputs"),
            encoding: EncodingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_scene_parallel: std::env::var("REEL_MAX_SCENE_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_scene_parallel),
            asset_timeout: Duration::from_secs(
                std::env::var("REEL_ASSET_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.asset_timeout.as_secs()),
            ),
            compose_timeout: Duration::from_secs(
                std::env::var("REEL_COMPOSE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.compose_timeout.as_secs()),
            ),
            encode_timeout: Duration::from_secs(
                std::env::var("REEL_ENCODE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.encode_timeout.as_secs()),
            ),
            work_dir: std::env::var("REEL_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("REEL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            encoding: EncodingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_scene_parallel, 3);
        assert_eq!(config.encoding.width, 1080);
        assert_eq!(config.encoding.height, 1920);
    }
}
