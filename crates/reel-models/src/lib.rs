//! Shared data models for the ReelPipe pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Video plans and scenes
//! - Generated assets, composed clips, and timelines
//! - Jobs and their lifecycle
//! - Encoding configuration

pub mod asset;
pub mod encoding;
pub mod job;
pub mod plan;

// Re-export common types
pub use asset::{AssetKind, AudioAsset, ComposedClip, ImageAsset, RenderOptions, Timeline};
pub use encoding::EncodingConfig;
pub use job::{Job, JobId, JobState};
pub use plan::{PlanError, Scene, SceneId, VideoPlan};
