//! End-to-end pipeline tests.
//!
//! Tests that render real clips are skipped when ffmpeg/ffprobe are not
//! installed; failure-path tests run everywhere because the pipeline
//! stops before any media work.

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::time::{sleep, Instant};

use reel_assets::{
    AssetClient, AssetError, AssetResult, ImageRequest, MockAssetClient, NarrationRequest,
};
use reel_media::{check_ffmpeg, check_ffprobe, probe_duration};
use reel_models::{AudioAsset, ImageAsset, Job, JobId, JobState, RenderOptions, Scene, SceneId, VideoPlan};
use reel_pipeline::{JobManager, PipelineConfig, PipelineError};

fn ffmpeg_available() -> bool {
    check_ffmpeg().is_ok() && check_ffprobe().is_ok()
}

fn drawtext_available() -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-filters"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains("drawtext"))
        .unwrap_or(false)
}

fn scene(id: u32, narration: &str, prompt: &str) -> Scene {
    Scene {
        id: SceneId(id),
        narration_text: narration.to_string(),
        visual_prompt: prompt.to_string(),
        estimated_duration_seconds: 5.0,
    }
}

fn test_config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig {
        work_dir: dir.path().join("work"),
        output_dir: dir.path().join("outputs"),
        ..Default::default()
    }
}

async fn wait_terminal(manager: &JobManager, id: &JobId, limit: Duration) -> Job {
    let deadline = Instant::now() + limit;
    loop {
        let job = manager.status(id).await.expect("job exists");
        if job.state.is_terminal() {
            return job;
        }
        assert!(Instant::now() < deadline, "job did not finish in time");
        sleep(Duration::from_millis(100)).await;
    }
}

/// Client that fails every image request.
struct BrokenImageClient {
    inner: MockAssetClient,
}

#[async_trait]
impl AssetClient for BrokenImageClient {
    async fn generate_narration(&self, request: &NarrationRequest) -> AssetResult<AudioAsset> {
        self.inner.generate_narration(request).await
    }

    async fn generate_image(&self, _request: &ImageRequest) -> AssetResult<ImageAsset> {
        Err(AssetError::http(502, "image backend down"))
    }
}

/// Client slow enough to cancel mid-generation.
struct SlowClient {
    inner: MockAssetClient,
}

#[async_trait]
impl AssetClient for SlowClient {
    async fn generate_narration(&self, request: &NarrationRequest) -> AssetResult<AudioAsset> {
        sleep(Duration::from_secs(2)).await;
        self.inner.generate_narration(request).await
    }

    async fn generate_image(&self, request: &ImageRequest) -> AssetResult<ImageAsset> {
        sleep(Duration::from_secs(2)).await;
        self.inner.generate_image(request).await
    }
}

#[tokio::test]
async fn test_failed_job_reports_first_scene_cause() {
    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(
        test_config(&dir),
        Arc::new(BrokenImageClient {
            inner: MockAssetClient::new(),
        }),
    );

    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![
            scene(5, "Hello world", "a sunrise"),
            scene(6, "More words here", "a sunset"),
        ],
    };

    let id = manager.submit(plan, RenderOptions::default()).await.unwrap();
    let job = wait_terminal(&manager, &id, Duration::from_secs(10)).await;

    assert_eq!(job.state, JobState::Failed);
    let reason = job.failure_reason.expect("failure reason recorded");
    assert!(reason.contains("scene 5"), "reason was: {}", reason);
    assert!(job.output_path.is_none());
}

#[tokio::test]
async fn test_cancelled_job_publishes_no_output() {
    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(
        test_config(&dir),
        Arc::new(SlowClient {
            inner: MockAssetClient::new(),
        }),
    );

    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![scene(0, "Hello world", "a sunrise")],
    };

    let id = manager.submit(plan, RenderOptions::default()).await.unwrap();
    sleep(Duration::from_millis(100)).await;
    manager.cancel(&id).await.unwrap();

    let job = wait_terminal(&manager, &id, Duration::from_secs(10)).await;
    assert_eq!(job.state, JobState::Failed);
    assert!(job
        .failure_reason
        .as_deref()
        .unwrap_or_default()
        .contains("cancelled"));

    let outputs = dir.path().join("outputs");
    let published = std::fs::read_dir(&outputs)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(published, 0, "no output file may be published");
}

#[tokio::test]
async fn test_submission_returns_running_immediately() {
    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(
        test_config(&dir),
        Arc::new(SlowClient {
            inner: MockAssetClient::new(),
        }),
    );

    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![scene(0, "Hello world", "a sunrise")],
    };

    let id = manager.submit(plan, RenderOptions::default()).await.unwrap();
    let job = manager.status(&id).await.unwrap();
    assert!(matches!(job.state, JobState::Pending | JobState::Running));

    manager.cancel(&id).await.unwrap();
    wait_terminal(&manager, &id, Duration::from_secs(10)).await;
}

#[tokio::test]
async fn test_unknown_job_lookup_is_not_found() {
    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(test_config(&dir), Arc::new(MockAssetClient::new()));
    let err = manager.status(&JobId::new()).await.unwrap_err();
    assert!(matches!(err, PipelineError::JobNotFound(_)));
}

#[tokio::test]
async fn test_end_to_end_render_duration_tracks_audio() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(test_config(&dir), Arc::new(MockAssetClient::new()));

    // Mock narration runs at 2.5 words/s: 5 words -> 2 s, 10 words -> 4 s.
    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![
            scene(0, "one two three four five", "a sunrise"),
            scene(1, "one two three four five six seven eight nine ten", "a sunset"),
        ],
    };
    let options = RenderOptions {
        include_subtitles: false,
        ..Default::default()
    };

    let id = manager.submit(plan, options).await.unwrap();
    let job = wait_terminal(&manager, &id, Duration::from_secs(180)).await;

    assert_eq!(job.state, JobState::Succeeded, "reason: {:?}", job.failure_reason);
    let output = job.output_path.expect("output path recorded");
    assert!(output.exists());

    // Expected total is the audio sum, not the 10 s of duration hints.
    let duration = probe_duration(&output).await.unwrap();
    assert!(
        (duration - 6.0).abs() < 0.25,
        "expected ~6 s of audio-driven timeline, got {:.3}",
        duration
    );
}

#[tokio::test]
async fn test_end_to_end_render_with_captions() {
    if !ffmpeg_available() || !drawtext_available() {
        eprintln!("skipping: ffmpeg with drawtext not installed");
        return;
    }

    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(test_config(&dir), Arc::new(MockAssetClient::new()));

    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![scene(0, "Hello world", "a sunrise")],
    };

    let id = manager.submit(plan, RenderOptions::default()).await.unwrap();
    let job = wait_terminal(&manager, &id, Duration::from_secs(180)).await;

    assert_eq!(job.state, JobState::Succeeded, "reason: {:?}", job.failure_reason);
    let duration = probe_duration(&job.output_path.unwrap()).await.unwrap();
    assert!((duration - 1.0).abs() < 0.25, "got {:.3}", duration);
}

#[tokio::test]
async fn test_degraded_job_succeeds_with_placeholder_assets() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let dir = TempDir::new().unwrap();
    let manager = JobManager::new(
        test_config(&dir),
        Arc::new(BrokenImageClient {
            inner: MockAssetClient::new(),
        }),
    );

    let plan = VideoPlan {
        title: "Test".to_string(),
        scenes: vec![
            scene(0, "Hello world", "a sunrise"),
            scene(1, "Another scene", "a sunset"),
        ],
    };
    let options = RenderOptions {
        include_subtitles: false,
        allow_placeholder_image: true,
        ..Default::default()
    };

    let id = manager.submit(plan, options).await.unwrap();
    let job = wait_terminal(&manager, &id, Duration::from_secs(180)).await;

    assert_eq!(job.state, JobState::Succeeded, "reason: {:?}", job.failure_reason);
    assert!(job.output_path.unwrap().exists());
}
