use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::job::models::{JobStatus, Priority};

/// Database representation of a job with all fields
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub status: JobStatus,
    pub date_submitted: DateTime<Utc>,
    pub archived: bool,
}

/// Fields supplied when inserting a job; everything else is store-assigned
#[derive(Debug, Clone)]
pub struct NewJob {
    pub description: String,
    pub location: String,
    pub priority: Priority,
}

/// Partial update merged into an existing job
#[derive(Debug, Clone)]
pub struct JobPatch {
    pub status: JobStatus,
    pub description: Option<String>,
    pub location: Option<String>,
}
