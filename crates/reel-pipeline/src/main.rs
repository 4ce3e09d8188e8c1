//! Pipeline CLI: submit a plan file and poll the job to completion.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_assets::AssetConfig;
use reel_models::{JobState, RenderOptions, VideoPlan};
use reel_pipeline::{JobManager, PipelineConfig};

/// Submission payload: the plan plus its render flags.
#[derive(Debug, Deserialize)]
struct SubmitRequest {
    #[serde(flatten)]
    plan: VideoPlan,
    #[serde(flatten)]
    options: RenderOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reel=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    let plan_path: PathBuf = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => bail!("usage: reel-pipeline <plan.json>"),
    };

    let contents = tokio::fs::read_to_string(&plan_path)
        .await
        .with_context(|| format!("reading plan file {}", plan_path.display()))?;
    let request: SubmitRequest =
        serde_json::from_str(&contents).context("parsing plan file")?;

    let config = PipelineConfig::from_env();
    let client = AssetConfig::from_env().build()?;
    let manager = JobManager::new(config, client);

    info!(
        title = %request.plan.title,
        scenes = request.plan.scenes.len(),
        "submitting plan"
    );

    let job_id = manager.submit(request.plan, request.options).await?;
    info!(%job_id, status = "processing", "job accepted");

    loop {
        let job = manager.status(&job_id).await?;
        match job.state {
            JobState::Succeeded => {
                let output = job
                    .output_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{}", output);
                info!(%job_id, output, "video rendered");
                return Ok(());
            }
            JobState::Failed => {
                let reason = job.failure_reason.unwrap_or_else(|| "unknown".to_string());
                bail!("job {} failed: {}", job_id, reason);
            }
            JobState::Pending | JobState::Running => {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
}
