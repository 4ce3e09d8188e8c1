//! Job orchestration for the script-to-video pipeline.
//!
//! [`JobManager`] accepts a validated plan, runs per-scene asset
//! generation under bounded concurrency, composes scene clips in plan
//! order, concatenates and encodes the timeline, and tracks each job's
//! lifecycle in an in-memory [`JobStore`] that callers poll by id.

pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod store;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::JobLogger;
pub use manager::JobManager;
pub use store::JobStore;
