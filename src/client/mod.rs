pub mod api_client;
pub mod cli;
pub mod view;

pub use api_client::{ClientError, JobApiClient};
pub use view::{Confirm, JobForm, JobListView, Notice, StatusFilter};
