//! Job list screen state.

use crate::api::{ApiClient, ClientError, Method};
use crate::notice::Notice;
use crate::session::Role;

use super::{job_path, Job};

/// Per-job actions offered in the list's action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    View,
    Edit,
    Delete,
}

/// Answer to the delete confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

pub struct JobListViewModel {
    api: ApiClient,
    jobs: Vec<Job>,
    is_admin: bool,
    search_text: String,
}

impl JobListViewModel {
    /// Mount the screen. The role is read here, once; later session changes
    /// are not observed until the next mount.
    pub fn mount(api: ApiClient) -> Self {
        let is_admin = match api.session().role() {
            Ok(role) => role == Some(Role::Admin),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read role from session");
                false
            }
        };
        tracing::debug!(is_admin, "job list mounted");
        Self {
            api,
            jobs: Vec::new(),
            is_admin,
            search_text: String::new(),
        }
    }

    /// Fetch every job and replace the held collection wholesale.
    /// On failure the previous collection is kept.
    pub async fn refresh(&mut self) -> Result<usize, ClientError> {
        let jobs: Vec<Job> = self.api.get_json("/jobs", false).await?;
        tracing::debug!(count = jobs.len(), "job list refreshed");
        self.jobs = jobs;
        Ok(self.jobs.len())
    }

    /// The rendered list. The search text is not applied here.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn find(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Jobs matching `search_text`, case-insensitively, over title, company,
    /// location and skills. The iterator is lazy and can be cloned to restart.
    pub fn filtered_by<'a>(&'a self, search_text: &str) -> impl Iterator<Item = &'a Job> + Clone + 'a {
        let needle = search_text.trim().to_lowercase();
        self.jobs.iter().filter(move |job| job.matches_lowercase(&needle))
    }

    /// Actions offered for a job. Edit and delete are admin-only.
    pub fn actions(&self) -> Vec<JobAction> {
        if self.is_admin {
            vec![JobAction::View, JobAction::Edit, JobAction::Delete]
        } else {
            vec![JobAction::View]
        }
    }

    /// Text of the delete confirmation prompt
    pub fn delete_prompt(&self, job_id: &str) -> String {
        let title = self.find(job_id).map(|j| j.title.as_str()).unwrap_or(job_id);
        format!("Are you sure you want to delete the Job: {} ?", title)
    }

    /// Delete a job once the user has confirmed.
    ///
    /// Issues one authenticated DELETE and then always re-fetches the list,
    /// whether or not the delete succeeded. The job stays in [`jobs`](Self::jobs)
    /// until that refresh lands. Returns the notice to show, or `None` when
    /// the user cancelled.
    pub async fn request_delete(&mut self, job_id: &str, confirmation: Confirmation) -> Option<Notice> {
        if confirmation == Confirmation::Cancelled {
            return None;
        }

        let deleted = match job_path(job_id) {
            Ok(path) => self.api.request(Method::Delete, &path, None, true).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &deleted {
            tracing::warn!(job_id, error = %e, "failed to delete job");
        }

        let refreshed = self.refresh().await;

        let notice = match (deleted, refreshed) {
            (Err(e), _) => Notice::from_error_or(&e, "Unable to delete the Job!"),
            (Ok(_), Err(e)) => Notice::from_error_or(&e, "Error in getting jobs from database!"),
            (Ok(_), Ok(_)) => Notice::success("Job Deleted Successfully"),
        };
        Some(notice)
    }

    /// Clear the stored session
    pub fn logout(&self) -> Result<(), ClientError> {
        self.api.session().clear().map_err(|e| {
            tracing::error!(error = %e, "failed to clear session");
            ClientError::from(e)
        })
    }
}
