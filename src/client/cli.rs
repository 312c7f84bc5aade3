use clap::Subcommand;
use std::io::{self, BufRead, Write};
use tracing::warn;
use uuid::Uuid;

use crate::api::job::models::{JobStatus, Priority};
use crate::db::models::JobRow;
use super::api_client::{ClientError, JobApiClient};
use super::view::{Confirm, JobForm, JobListView, StatusFilter};

/// Job commands issued against a running server
#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// List active jobs, or archived ones with --archived
    List {
        #[arg(long)]
        archived: bool,
        /// Only show jobs with this status, e.g. "In Progress"
        #[arg(long)]
        status: Option<JobStatus>,
    },
    /// Submit a new maintenance request
    Create {
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "Low")]
        priority: Priority,
    },
    /// Change the status of one job
    SetStatus { id: Uuid, status: JobStatus },
    /// Change the status of several jobs at once
    BatchStatus {
        #[arg(long)]
        status: JobStatus,
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Move a job to the archived list
    Archive { id: Uuid },
    /// Permanently delete a job
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Reads a y/N answer from stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{}\n\n[y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn print_jobs<'a>(jobs: impl Iterator<Item = &'a JobRow>) {
    let mut count = 0;
    for job in jobs {
        count += 1;
        println!("{}", job_line(job));
    }
    if count == 0 {
        println!("No jobs found");
    }
}

/// One row of `jobs list`, with status and priority in fixed-width columns
fn job_line(job: &JobRow) -> String {
    format!(
        "{}  {:<11}  {:<6}  {}  {} - {}",
        job.id,
        job.status,
        job.priority,
        job.date_submitted.format("%Y-%m-%d %H:%M"),
        job.description,
        job.location
    )
}

/// Run one job command through the list view
pub async fn run(command: JobsCommand, client: JobApiClient) -> Result<(), ClientError> {
    let mut view = JobListView::load(client).await?;

    match command {
        JobsCommand::List { archived, status } => {
            view.set_show_archived(archived).await?;
            if let Some(status) = status {
                view.set_filter(StatusFilter::Only(status));
            }
            print_jobs(view.visible_jobs());
        }
        JobsCommand::Create {
            description,
            location,
            priority,
        } => {
            let mut form = JobForm {
                description,
                location,
                priority,
            };
            println!("{}", view.create(&mut form).await?);
        }
        JobsCommand::SetStatus { id, status } => {
            println!("{}", view.change_status(id, status).await?);
        }
        JobsCommand::BatchStatus { status, ids } => {
            for id in ids {
                if !view.is_selected(id) {
                    view.toggle_selected(id);
                }
            }
            let response = view.batch_update(status).await?;
            println!("{}", response.message);
        }
        JobsCommand::Archive { id } => {
            println!("{}", view.archive(id).await?);
        }
        JobsCommand::Delete { id, yes } => {
            let notice = if yes {
                view.delete(id, &|_: &str| true).await?
            } else {
                view.delete(id, &StdinConfirm).await?
            };
            println!("{}", notice);
        }
    }

    Ok(())
}
