use async_trait::async_trait;
use uuid::Uuid;

use crate::api::job::models::JobStatus;
use crate::db::models::{JobPatch, JobRow, NewJob};

/// Persistence for job records.
///
/// Each call is atomic on its own. Nothing orders a single update against a
/// concurrent batch update touching the same id: the last write wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job with status `Submitted`, not archived, stamped now.
    async fn insert(&self, job: NewJob) -> Result<JobRow, sqlx::Error>;

    /// All jobs whose archived flag equals `archived`, ordered by status
    /// then submission date.
    async fn list(&self, archived: bool) -> Result<Vec<JobRow>, sqlx::Error>;

    /// Merge `patch` into the job. `None` when no job has this id.
    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobRow>, sqlx::Error>;

    /// Set `status` on every listed job not already at it. Returns the
    /// number of jobs changed.
    async fn update_status_many(&self, ids: &[Uuid], status: JobStatus)
        -> Result<u64, sqlx::Error>;

    /// Mark the job archived. `None` when no job has this id.
    async fn archive(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error>;

    /// Remove the job. `false` when no job has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Release connections. Called once on shutdown.
    async fn close(&self);
}
