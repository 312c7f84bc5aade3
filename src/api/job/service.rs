use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::validation::ErrorResponse;
use crate::db::models::{JobPatch, JobRow, NewJob};
use crate::db::store::JobStore;
use super::dto::{BatchUpdateResponse, MessageResponse};
use super::models::{BatchStatusUpdate, CreateJob, JobStatus, Priority, UpdateJob};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Validation failed
    ValidationError(String),

    /// Job not found
    NotFound(Uuid),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) | ServiceError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Job not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                })
            }
        }
    }
}

/// Parse a client-supplied job id, tolerating surrounding whitespace
pub fn parse_job_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::ValidationError(format!("Invalid job id: {}", raw)))
}

/// Job service containing business logic
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    /// Create a new JobService over an explicit store handle
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Create a single job
    ///
    /// The payload has already passed field validation; text fields are
    /// trimmed before they are stored.
    pub async fn create_job(&self, job: &CreateJob) -> Result<JobRow, ServiceError> {
        let priority: Priority = job
            .priority
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| ServiceError::ValidationError("Priority must be Low, Medium, or High".to_string()))?;

        let new_job = NewJob {
            description: job.description.as_deref().unwrap_or_default().trim().to_string(),
            location: job.location.as_deref().unwrap_or_default().trim().to_string(),
            priority,
        };
        if new_job.description.is_empty() || new_job.location.is_empty() {
            return Err(ServiceError::ValidationError(
                "Description and location are required".to_string(),
            ));
        }

        info!("Service: Creating job at location={}", new_job.location);

        let job_row = self
            .store
            .insert(new_job)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!("Service: Job created successfully with id={}", job_row.id);
        Ok(job_row)
    }

    /// List active or archived jobs, ordered by status then submission date
    pub async fn list_jobs(&self, archived: bool) -> Result<Vec<JobRow>, ServiceError> {
        let jobs = self
            .store
            .list(archived)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!("Service: Listed {} jobs (archived={})", jobs.len(), archived);
        Ok(jobs)
    }

    /// Overwrite a job's status and merge any supplied text fields
    pub async fn update_job(&self, id: Uuid, update: &UpdateJob) -> Result<JobRow, ServiceError> {
        let status: JobStatus = update
            .status
            .parse()
            .map_err(|_| ServiceError::ValidationError("Invalid status value".to_string()))?;

        let patch = JobPatch {
            status,
            description: update.description.as_deref().map(|d| d.trim().to_string()),
            location: update.location.as_deref().map(|l| l.trim().to_string()),
        };

        info!("Service: Updating job {} to status={}", id, status);

        self.store
            .update(id, patch)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Apply one status to many jobs, skipping those already at it
    ///
    /// Every id is parsed before anything is written; one malformed id
    /// rejects the whole batch. Zero modified jobs is still a success.
    pub async fn update_jobs_status(
        &self,
        batch: &BatchStatusUpdate,
    ) -> Result<BatchUpdateResponse, ServiceError> {
        let (Some(raw_ids), Some(raw_status)) = (&batch.ids, &batch.status) else {
            return Err(ServiceError::ValidationError("Missing ids or status".to_string()));
        };

        let status: JobStatus = raw_status
            .parse()
            .map_err(|_| ServiceError::ValidationError("Invalid status value".to_string()))?;

        let ids = raw_ids
            .iter()
            .map(|raw| parse_job_id(raw))
            .collect::<Result<Vec<Uuid>, ServiceError>>()?;

        info!("Service: Batch updating {} jobs to status={}", ids.len(), status);

        let modified = self
            .store
            .update_status_many(&ids, status)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if modified == 0 {
            info!("Service: Batch update changed no jobs");
            return Ok(BatchUpdateResponse {
                message: "No jobs were updated because they were already in the desired state"
                    .to_string(),
                modified_count: None,
            });
        }

        info!("Service: Batch update modified {} jobs", modified);
        Ok(BatchUpdateResponse {
            message: format!("{} jobs updated successfully", modified),
            modified_count: Some(modified),
        })
    }

    /// Mark a job archived. Archiving an archived job succeeds unchanged.
    pub async fn archive_job(&self, id: Uuid) -> Result<JobRow, ServiceError> {
        info!("Service: Archiving job {}", id);

        self.store
            .archive(id)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Permanently remove a job
    pub async fn delete_job(&self, id: Uuid) -> Result<MessageResponse, ServiceError> {
        info!("Service: Deleting job {}", id);

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if !deleted {
            return Err(ServiceError::NotFound(id));
        }

        Ok(MessageResponse {
            message: "Job deleted successfully".to_string(),
        })
    }

    /// Check the backing store is reachable
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.store.ping().await.map_err(ServiceError::DatabaseError)
    }
}
