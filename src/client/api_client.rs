use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::job::dto::{BatchUpdateResponse, MessageResponse};
use crate::api::job::models::{JobStatus, Priority};
use crate::db::models::JobRow;

/// Errors surfaced by the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("job not found: {0}")]
    NotFound(String),

    #[error("server returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

#[derive(Serialize)]
struct CreateBody<'a> {
    description: &'a str,
    location: &'a str,
    priority: Priority,
}

#[derive(Serialize)]
struct StatusBody {
    status: JobStatus,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    ids: &'a [Uuid],
    status: JobStatus,
}

/// Thin client over the `/api/jobs` endpoints; one request per call
#[derive(Clone)]
pub struct JobApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl JobApiClient {
    /// `base_url` includes the `/api` prefix, e.g. `http://127.0.0.1:8080/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/jobs{}", self.base_url, path)
    }

    pub async fn list_jobs(&self, archived: bool) -> Result<Vec<JobRow>, ClientError> {
        let response = self
            .http
            .get(self.url(""))
            .query(&[("archived", archived)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_job(
        &self,
        description: &str,
        location: &str,
        priority: Priority,
    ) -> Result<JobRow, ClientError> {
        let body = CreateBody {
            description,
            location,
            priority,
        };
        let response = self.http.post(self.url("")).json(&body).send().await?;
        decode(response).await
    }

    pub async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<JobRow, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/{}", id)))
            .json(&StatusBody { status })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_statuses(
        &self,
        ids: &[Uuid],
        status: JobStatus,
    ) -> Result<BatchUpdateResponse, ClientError> {
        let response = self
            .http
            .put(self.url("/status"))
            .json(&BatchBody { ids, status })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn archive_job(&self, id: Uuid) -> Result<JobRow, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/archive/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_job(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/{}", id)))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(body));
    }
    Err(ClientError::Api { status, body })
}
