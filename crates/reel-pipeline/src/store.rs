//! In-memory job store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use reel_models::{Job, JobId};

/// Shared store of job records, keyed by id.
///
/// This is the only mutable state shared across concurrent job runs.
/// Reads hand out snapshots; each job is mutated only by its own run.
/// Records are retained after completion until explicitly reaped.
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly created job.
    pub async fn insert(&self, job: Job) {
        self.inner.write().await.insert(job.id.clone(), job);
    }

    /// Snapshot of a job's current state.
    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.inner.read().await.get(id).cloned()
    }

    /// Apply a transition to a stored job. Missing ids are ignored; the
    /// transition methods themselves refuse to leave terminal states.
    pub async fn update(&self, id: &JobId, f: impl FnOnce(Job) -> Job) {
        let mut jobs = self.inner.write().await;
        if let Some(job) = jobs.remove(id) {
            jobs.insert(id.clone(), f(job));
        }
    }

    /// Number of stored jobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop terminal jobs that finished more than `older_than` ago.
    /// Returns the number of jobs removed. Expiry policy is the
    /// deployment's call; nothing in the pipeline invokes this on its own.
    pub async fn reap_finished(&self, older_than: Duration) -> usize {
        let cutoff = Utc::now() - older_than;
        let mut jobs = self.inner.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| {
            !(job.state.is_terminal() && job.finished_at.map(|t| t < cutoff).unwrap_or(false))
        });
        before - jobs.len()
    }
}
