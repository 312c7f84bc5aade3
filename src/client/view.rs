//! Client-side state for the job form and job list.
//!
//! The list keeps only the last fetched page of jobs. Every mutation is
//! followed by a full re-fetch; nothing is patched locally.

use std::collections::BTreeSet;
use std::fmt;
use tracing::error;
use uuid::Uuid;

use crate::api::job::dto::BatchUpdateResponse;
use crate::api::job::models::{JobStatus, Priority};
use crate::db::models::JobRow;
use super::api_client::{ClientError, JobApiClient};

/// User-facing confirmation of a completed action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    JobAdded,
    JobUpdated,
    JobDeleted,
    Cancelled,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::JobAdded => "Job added successfully!",
            Notice::JobUpdated => "Job updated successfully!",
            Notice::JobDeleted => "Job deleted successfully!",
            Notice::Cancelled => "Action cancelled",
        };
        f.write_str(text)
    }
}

/// Asked before a job is deleted
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Prompt shown before deleting `job`
pub fn delete_prompt(job: &JobRow) -> String {
    format!(
        "Are you sure you want to delete the job:\n\nDescription: {}\nLocation: {}\nPriority: {}",
        job.description, job.location, job.priority
    )
}

/// New-job form. Resets to defaults after a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    pub description: String,
    pub location: String,
    pub priority: Priority,
}

impl JobForm {
    pub async fn submit(&mut self, client: &JobApiClient) -> Result<JobRow, ClientError> {
        let job = client
            .create_job(&self.description, &self.location, self.priority)
            .await
            .inspect_err(|e| error!("Error creating job: {}", e))?;

        *self = JobForm::default();
        Ok(job)
    }
}

/// Client-side status filter; never sent to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn matches(&self, job: &JobRow) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => job.status == *status,
        }
    }
}

/// Filterable, selectable list of jobs
pub struct JobListView {
    client: JobApiClient,
    jobs: Vec<JobRow>,
    filter: StatusFilter,
    selected: BTreeSet<Uuid>,
    show_archived: bool,
}

impl JobListView {
    /// Create the view and fetch active jobs
    pub async fn load(client: JobApiClient) -> Result<Self, ClientError> {
        let mut view = Self {
            client,
            jobs: Vec::new(),
            filter: StatusFilter::All,
            selected: BTreeSet::new(),
            show_archived: false,
        };
        view.refresh().await?;
        Ok(view)
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.jobs = self
            .client
            .list_jobs(self.show_archived)
            .await
            .inspect_err(|e| error!("Error fetching jobs: {}", e))?;
        Ok(())
    }

    /// Every job from the last fetch, in server order
    pub fn jobs(&self) -> &[JobRow] {
        &self.jobs
    }

    /// Jobs passing the status filter and archived toggle, in server order
    pub fn visible_jobs(&self) -> impl Iterator<Item = &JobRow> {
        self.jobs
            .iter()
            .filter(|job| self.filter.matches(job) && job.archived == self.show_archived)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    /// Flip between active and archived jobs; re-fetches when it changes
    pub async fn set_show_archived(&mut self, show_archived: bool) -> Result<(), ClientError> {
        if self.show_archived == show_archived {
            return Ok(());
        }
        self.show_archived = show_archived;
        self.refresh().await
    }

    pub fn selected(&self) -> &BTreeSet<Uuid> {
        &self.selected
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Add or remove one job from the batch selection
    pub fn toggle_selected(&mut self, id: Uuid) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Submit the form, then re-fetch
    pub async fn create(&mut self, form: &mut JobForm) -> Result<Notice, ClientError> {
        form.submit(&self.client).await?;
        self.refresh().await?;
        Ok(Notice::JobAdded)
    }

    pub async fn change_status(&mut self, id: Uuid, status: JobStatus) -> Result<Notice, ClientError> {
        self.client
            .update_status(id, status)
            .await
            .inspect_err(|e| error!("Error updating status: {}", e))?;
        self.refresh().await?;
        Ok(Notice::JobUpdated)
    }

    /// Apply `status` to the selected jobs; the selection is cleared on success
    pub async fn batch_update(
        &mut self,
        status: JobStatus,
    ) -> Result<BatchUpdateResponse, ClientError> {
        let ids: Vec<Uuid> = self.selected.iter().copied().collect();
        let response = self
            .client
            .update_statuses(&ids, status)
            .await
            .inspect_err(|e| error!("Error performing batch update: {}", e))?;

        self.selected.clear();
        self.refresh().await?;
        Ok(response)
    }

    pub async fn archive(&mut self, id: Uuid) -> Result<Notice, ClientError> {
        self.client
            .archive_job(id)
            .await
            .inspect_err(|e| error!("Error archiving job: {}", e))?;
        self.refresh().await?;
        Ok(Notice::JobUpdated)
    }

    /// Delete a job after `confirm` approves it
    ///
    /// Returns `Notice::Cancelled` without sending anything when declined.
    pub async fn delete(&mut self, id: Uuid, confirm: &dyn Confirm) -> Result<Notice, ClientError> {
        let prompt = match self.jobs.iter().find(|job| job.id == id) {
            Some(job) => delete_prompt(job),
            None => format!("Are you sure you want to delete the job {}?", id),
        };
        if !confirm.confirm(&prompt) {
            return Ok(Notice::Cancelled);
        }

        self.client
            .delete_job(id)
            .await
            .inspect_err(|e| error!("Error deleting job: {}", e))?;
        self.selected.remove(&id);
        self.refresh().await?;
        Ok(Notice::JobDeleted)
    }
}
