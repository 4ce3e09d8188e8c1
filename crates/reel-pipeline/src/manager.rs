//! Job orchestration.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{watch, RwLock, Semaphore};
use tracing::warn;

use reel_assets::{placeholder_image, AssetClient, AssetError, AssetResult, ImageRequest, NarrationRequest};
use reel_media::{concat, Encoder, SceneAudio, SceneComposer};
use reel_models::{AssetKind, ImageAsset, Job, JobId, RenderOptions, Scene, VideoPlan};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::JobLogger;
use crate::store::JobStore;

/// Top-level orchestrator.
///
/// `submit` validates synchronously, records the job, and spawns one
/// asynchronous run; callers poll `status` by id. Per-scene asset
/// generation across all running jobs shares one bounded worker pool.
#[derive(Clone)]
pub struct JobManager {
    config: Arc<PipelineConfig>,
    client: Arc<dyn AssetClient>,
    store: JobStore,
    scene_semaphore: Arc<Semaphore>,
    cancellations: Arc<RwLock<HashMap<JobId, watch::Sender<bool>>>>,
}

impl JobManager {
    /// Create a manager with the given config and asset client.
    pub fn new(config: PipelineConfig, client: Arc<dyn AssetClient>) -> Self {
        let scene_semaphore = Arc::new(Semaphore::new(config.max_scene_parallel));
        Self {
            config: Arc::new(config),
            client,
            store: JobStore::new(),
            scene_semaphore,
            cancellations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Access the underlying job store (snapshots, reaping).
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Validate and submit a plan. Returns the new job's id immediately;
    /// the pipeline runs in the background. A plan that fails validation
    /// never creates a job.
    pub async fn submit(&self, plan: VideoPlan, options: RenderOptions) -> PipelineResult<JobId> {
        plan.validate()?;

        let job = Job::new(plan, options);
        let job_id = job.id.clone();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.store.insert(job).await;
        self.store.update(&job_id, Job::start).await;
        self.cancellations
            .write()
            .await
            .insert(job_id.clone(), cancel_tx);

        let manager = self.clone();
        let id = job_id.clone();
        tokio::spawn(async move {
            manager.run_job(id, cancel_rx).await;
        });

        Ok(job_id)
    }

    /// Snapshot of a job's current state.
    pub async fn status(&self, id: &JobId) -> PipelineResult<Job> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| PipelineError::JobNotFound(id.clone()))
    }

    /// Request cooperative cancellation of a running job.
    ///
    /// The run stops issuing new asset requests and will not start the
    /// encode; a terminal job is left untouched.
    pub async fn cancel(&self, id: &JobId) -> PipelineResult<()> {
        self.status(id).await?;
        if let Some(tx) = self.cancellations.read().await.get(id) {
            let _ = tx.send(true);
        }
        Ok(())
    }

    /// Signal every in-flight job to cancel (process shutdown).
    pub async fn shutdown(&self) {
        for tx in self.cancellations.read().await.values() {
            let _ = tx.send(true);
        }
    }

    /// Drive one job to a terminal state.
    async fn run_job(&self, job_id: JobId, cancel_rx: watch::Receiver<bool>) {
        let logger = JobLogger::new(&job_id, "pipeline");
        logger.log_start("pipeline run started");

        match self.execute(&job_id, cancel_rx).await {
            Ok(output) => {
                logger.log_progress(&format!("job succeeded: {}", output.display()));
                self.store.update(&job_id, |j| j.succeed(output)).await;
            }
            Err(e) => {
                logger.log_error(&format!("job failed: {}", e));
                self.store.update(&job_id, |j| j.fail(e.to_string())).await;
            }
        }

        self.cancellations.write().await.remove(&job_id);
    }

    /// The pipeline run: assets -> compose -> concat -> encode.
    async fn execute(
        &self,
        job_id: &JobId,
        cancel_rx: watch::Receiver<bool>,
    ) -> PipelineResult<PathBuf> {
        let job = self
            .store
            .get(job_id)
            .await
            .ok_or_else(|| PipelineError::JobNotFound(job_id.clone()))?;
        let plan = job.plan;
        let options = job.options;
        let logger = JobLogger::new(job_id, "assets");

        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        // Scratch holds all per-scene work; dropping it discards sibling
        // results when any stage fails.
        let scratch = tempfile::Builder::new()
            .prefix(&format!("job-{}-", job_id))
            .tempdir_in(&self.config.work_dir)?;

        logger.log_progress(&format!("generating assets for {} scenes", plan.scenes.len()));
        let assets = self.generate_assets(&plan, &options, &cancel_rx).await?;

        let composer = SceneComposer::new(scratch.path(), self.config.encoding.clone())
            .with_timeout(self.config.compose_timeout.as_secs())
            .with_cancel(cancel_rx.clone());

        let compose_logger = logger.stage("compose");
        let mut clips = Vec::with_capacity(plan.scenes.len());
        for (scene, (audio, image)) in plan.scenes.iter().zip(assets) {
            if *cancel_rx.borrow() {
                return Err(PipelineError::Cancelled);
            }
            let clip = composer
                .compose(scene, audio, &image, options.include_subtitles)
                .await
                .map_err(|e| PipelineError::composition_failed(scene.id, e))?;
            compose_logger.log_progress(&format!(
                "scene {} composed ({:.2}s)",
                clip.scene_id, clip.duration_seconds
            ));
            clips.push(clip);
        }

        let timeline = concat::join(clips).map_err(PipelineError::concatenation_failed)?;

        if *cancel_rx.borrow() {
            return Err(PipelineError::Cancelled);
        }

        let output_path = self.config.output_dir.join(format!("video_{}.mp4", job_id));
        let encoder = Encoder::new(self.config.encoding.clone())
            .with_timeout(self.config.encode_timeout.as_secs())
            .with_cancel(cancel_rx.clone());
        encoder
            .render(&timeline, &output_path)
            .await
            .map_err(PipelineError::encoding_failed)?;

        Ok(output_path)
    }

    /// Generate audio+image assets for every scene under the bounded
    /// worker pool. Results come back indexed by scene position, so
    /// downstream stages see plan order regardless of completion order.
    /// The first failing scene (in plan order) decides the error.
    async fn generate_assets(
        &self,
        plan: &VideoPlan,
        options: &RenderOptions,
        cancel_rx: &watch::Receiver<bool>,
    ) -> PipelineResult<Vec<(SceneAudio, ImageAsset)>> {
        let futures = plan.scenes.iter().map(|scene| {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&self.scene_semaphore);
            let cancel_rx = cancel_rx.clone();
            let options = *options;
            let scene = scene.clone();
            let timeout = self.config.asset_timeout;
            let width = self.config.encoding.width;
            let height = self.config.encoding.height;

            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| PipelineError::Cancelled)?;
                if *cancel_rx.borrow() {
                    return Err(PipelineError::Cancelled);
                }
                generate_scene_assets(client.as_ref(), &scene, &options, timeout, width, height)
                    .await
            }
        });

        join_all(futures).await.into_iter().collect()
    }
}

/// Generate the audio and image assets for one scene, applying the
/// configured degradation policy per asset kind.
async fn generate_scene_assets(
    client: &dyn AssetClient,
    scene: &Scene,
    options: &RenderOptions,
    timeout: Duration,
    width: u32,
    height: u32,
) -> PipelineResult<(SceneAudio, ImageAsset)> {
    let audio = if !options.include_voice {
        SceneAudio::Silent {
            duration_seconds: scene.estimated_duration_seconds,
        }
    } else {
        let request = NarrationRequest::for_scene(scene);
        match with_timeout(timeout, client.generate_narration(&request)).await {
            Ok(asset) => SceneAudio::Narration(asset),
            Err(e) if options.allow_estimated_duration => {
                warn!(
                    scene_id = %scene.id,
                    error = %e,
                    "narration failed, falling back to estimated duration"
                );
                SceneAudio::Silent {
                    duration_seconds: scene.estimated_duration_seconds,
                }
            }
            Err(e) => return Err(PipelineError::asset_failed(scene.id, AssetKind::Audio, e)),
        }
    };

    let request = ImageRequest::for_scene(scene, width, height);
    let image = match with_timeout(timeout, client.generate_image(&request)).await {
        Ok(asset) => asset,
        Err(e) if options.allow_placeholder_image => {
            warn!(
                scene_id = %scene.id,
                error = %e,
                "image generation failed, substituting placeholder"
            );
            placeholder_image(&scene.visual_prompt, width, height)
                .map_err(|pe| PipelineError::asset_failed(scene.id, AssetKind::Image, pe))?
        }
        Err(e) => return Err(PipelineError::asset_failed(scene.id, AssetKind::Image, e)),
    };

    Ok((audio, image))
}

/// Apply the per-call timeout, folding expiry into the asset error space.
async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = AssetResult<T>>,
) -> AssetResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AssetError::Timeout(timeout.as_secs())),
    }
}
