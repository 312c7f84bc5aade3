use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::api::job::models::JobStatus;
use crate::db::models::{JobPatch, JobRow, NewJob};
use crate::db::store::JobStore;

const JOB_COLUMNS: &str = "id, description, location, priority, status, date_submitted, archived";

/// Repository for Job database operations
#[derive(Clone)]
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn insert(&self, job: NewJob) -> Result<JobRow, sqlx::Error> {
        debug!(
            "Creating job: location={}, priority={}",
            job.location, job.priority
        );

        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (description, location, priority)
            VALUES ($1, $2, $3)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.priority)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    async fn list(&self, archived: bool) -> Result<Vec<JobRow>, sqlx::Error> {
        debug!("Listing jobs: archived={}", archived);

        // job_status is a native enum, so ORDER BY follows declaration order
        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE archived = $1
            ORDER BY status ASC, date_submitted ASC
            "#
        ))
        .bind(archived)
        .fetch_all(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job {}: status={}", id, patch.status);

        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs
            SET status = $2,
                description = COALESCE($3, description),
                location = COALESCE($4, location)
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.status)
        .bind(patch.description)
        .bind(patch.location)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_status_many(
        &self,
        ids: &[Uuid],
        status: JobStatus,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            debug!("Batch status update called with empty id list");
            return Ok(0);
        }

        debug!("Batch status update of {} jobs to {}", ids.len(), status);

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1
            WHERE id = ANY($2) AND status <> $1
            "#,
        )
        .bind(status)
        .bind(ids)
        .execute(&self.pool)
        .await?;

        let rows_affected = result.rows_affected();
        debug!("Batch status update completed: {} rows modified", rows_affected);

        Ok(rows_affected)
    }

    async fn archive(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Archiving job {}", id);

        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs
            SET archived = TRUE
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        debug!("Deleting job {}", id);

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
