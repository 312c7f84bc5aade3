use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Urgency of a maintenance job, fixed at creation
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "job_priority")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Job status enum representing the state of a job
///
/// Variants are declared in listing order: jobs sort by status first,
/// `Submitted` before `In Progress` before `Completed`. Any status may
/// follow any other.
#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    sqlx::Type,
)]
#[sqlx(type_name = "job_status")]
pub enum JobStatus {
    #[default]
    Submitted,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Completed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [
        JobStatus::Submitted,
        JobStatus::InProgress,
        JobStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "Submitted",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
        }
    }
}

/// Returned when text does not name a known enumeration member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn known_priority(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Priority>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("priority"))
}

fn known_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<JobStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status"))
}

/// Read a text field that a client may send as null or as a bare value
///
/// Null becomes `None`; numbers, booleans and the like keep their JSON text
/// so field validation reports them instead of the body decoder.
fn text_or_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Payload for `POST /api/jobs`
///
/// Missing and null fields are both reported with their own message
/// instead of a generic deserialization failure.
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct CreateJob {
    #[serde(default, deserialize_with = "text_or_null")]
    #[validate(
        required(message = "Description is required"),
        custom(function = "not_blank", message = "Description is required")
    )]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "text_or_null")]
    #[validate(
        required(message = "Location is required"),
        custom(function = "not_blank", message = "Location is required")
    )]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "text_or_null")]
    #[validate(
        required(message = "Priority must be Low, Medium, or High"),
        custom(function = "known_priority", message = "Priority must be Low, Medium, or High")
    )]
    pub priority: Option<String>,
}

/// Payload for `PUT /api/jobs/{id}`
///
/// `status` is required; `description` and `location` are merged when present.
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateJob {
    #[serde(default)]
    #[validate(custom(function = "known_status", message = "Invalid status value"))]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Location cannot be empty"))]
    pub location: Option<String>,
}

/// Payload for `PUT /api/jobs/status`
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct BatchStatusUpdate {
    #[serde(default)]
    #[validate(required(message = "Missing ids or status"))]
    pub ids: Option<Vec<String>>,

    #[serde(default)]
    #[validate(
        required(message = "Missing ids or status"),
        custom(function = "known_status", message = "Invalid status value")
    )]
    pub status: Option<String>,
}
