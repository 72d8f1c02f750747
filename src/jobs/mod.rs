//! Background crawl jobs: submission, execution, status tracking.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{Job, JobStatus};
use crate::services::CrawlRunner;

/// In-memory table of submitted jobs.
///
/// Every update mutates the entry under the write lock, so a concurrent
/// [`JobStore::snapshot`] sees either the old or the new
/// status/result/error triple, never a mix. Terminal entries are never
/// overwritten.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }

    pub async fn mark_running(&self, id: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Running;
            }
        }
    }

    pub async fn mark_succeeded(&self, id: &str, result: PathBuf) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Succeeded;
                job.result = Some(result);
                job.finished_at = Some(Utc::now());
            }
        }
    }

    pub async fn mark_failed(&self, id: &str, reason: String) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Failed;
                job.error = Some(reason);
                job.finished_at = Some(Utc::now());
            }
        }
    }

    /// Point-in-time view of a job. Unknown ids read as a pending job,
    /// so a caller polling an id it just received never sees an error.
    pub async fn snapshot(&self, id: &str) -> Job {
        let jobs = self.jobs.read().await;
        jobs.get(id)
            .cloned()
            .unwrap_or_else(|| Job::new(id.to_string()))
    }
}

/// Submits crawls as background tasks and tracks their lifecycle.
///
/// A submitted job always runs to a terminal state; the controller
/// never cancels, pauses, or re-runs one.
pub struct JobController {
    store: JobStore,
    runner: Arc<dyn CrawlRunner>,
}

impl JobController {
    pub fn new(runner: Arc<dyn CrawlRunner>) -> Self {
        Self {
            store: JobStore::new(),
            runner,
        }
    }

    /// Create a job and schedule its crawl; returns the id immediately.
    pub async fn submit(&self, target: usize, output: PathBuf) -> String {
        let id = Uuid::new_v4().to_string();
        self.store.insert(Job::new(id.clone())).await;
        info!(
            "job {id} submitted, target {target} tenders -> {}",
            output.display()
        );

        let store = self.store.clone();
        let runner = self.runner.clone();
        let job_id = id.clone();
        tokio::spawn(async move {
            store.mark_running(&job_id).await;
            match runner.run(target, &output).await {
                Ok(path) => {
                    info!("job {job_id} finished: {}", path.display());
                    store.mark_succeeded(&job_id, path).await;
                }
                Err(err) => {
                    error!("job {job_id} failed: {err:#}");
                    store.mark_failed(&job_id, err.to_string()).await;
                }
            }
        });

        id
    }

    pub async fn status(&self, id: &str) -> Job {
        self.store.snapshot(id).await
    }
}
