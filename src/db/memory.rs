use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::api::job::models::JobStatus;
use crate::db::models::{JobPatch, JobRow, NewJob};
use crate::db::store::JobStore;

/// In-process job store for tests and `STORE_BACKEND=memory`
///
/// Jobs are kept in insertion order, so jobs with equal status and
/// timestamp list in the order they were created.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<JobRow>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: NewJob) -> Result<JobRow, sqlx::Error> {
        let row = JobRow {
            id: Uuid::new_v4(),
            description: job.description,
            location: job.location,
            priority: job.priority,
            status: JobStatus::default(),
            date_submitted: Utc::now(),
            archived: false,
        };

        self.jobs.write().await.push(row.clone());
        debug!("Job created in memory with id={}", row.id);
        Ok(row)
    }

    async fn list(&self, archived: bool) -> Result<Vec<JobRow>, sqlx::Error> {
        let jobs = self.jobs.read().await;
        let mut rows: Vec<JobRow> = jobs
            .iter()
            .filter(|job| job.archived == archived)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then(a.date_submitted.cmp(&b.date_submitted))
        });
        Ok(rows)
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobRow>, sqlx::Error> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.iter_mut().find(|job| job.id == id) else {
            return Ok(None);
        };

        job.status = patch.status;
        if let Some(description) = patch.description {
            job.description = description;
        }
        if let Some(location) = patch.location {
            job.location = location;
        }
        Ok(Some(job.clone()))
    }

    async fn update_status_many(
        &self,
        ids: &[Uuid],
        status: JobStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut jobs = self.jobs.write().await;
        let mut modified = 0;
        for job in jobs.iter_mut() {
            if ids.contains(&job.id) && job.status != status {
                job.status = status;
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn archive(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.iter_mut().find(|job| job.id == id).map(|job| {
            job.archived = true;
            job.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        Ok(jobs.len() < before)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn close(&self) {}
}
