use serde::{Deserialize, Serialize};

/// Query string for `GET /api/jobs`
#[derive(Deserialize, Debug, Default)]
pub struct ListJobsQuery {
    pub archived: Option<String>,
}

impl ListJobsQuery {
    /// Only the literal `true` selects archived jobs
    pub fn archived(&self) -> bool {
        self.archived.as_deref() == Some("true")
    }
}

/// Response for batch status updates
///
/// `modifiedCount` is omitted when nothing changed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_count: Option<u64>,
}

impl BatchUpdateResponse {
    pub fn modified(&self) -> u64 {
        self.modified_count.unwrap_or(0)
    }
}

/// Plain acknowledgement body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}
