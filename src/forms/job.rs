//! Job create/edit form.

use async_trait::async_trait;
use serde_json::Value;

use super::validation::{parse_number, split_skills};
use super::{Fields, FormController, FormKind, Rule};
use crate::api::{ApiClient, ClientError, Method};
use crate::jobs::{job_path, Job, JobDraft, JobStatus};

/// Fields that must be non-empty, in the order they are checked
pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "company",
    "description",
    "location",
    "salary",
    "jobType",
    "experienceLevel",
    "applicationDeadline",
    "status",
];

const RULES: &[Rule] = &[
    Rule::EachPresent {
        fields: REQUIRED_FIELDS,
    },
    Rule::FiniteNumber {
        field: "salary",
        message: "Salary has to be a valid number!",
    },
    Rule::CalendarDate {
        field: "applicationDeadline",
        message: "The Deadline has to be a valid date (YYYY-MM-DD)",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    Create,
    /// Replace the job with this id
    Edit(String),
}

#[derive(Debug, Clone)]
pub struct JobForm {
    target: JobTarget,
}

impl JobForm {
    pub fn create() -> Self {
        Self {
            target: JobTarget::Create,
        }
    }

    pub fn edit(job_id: impl Into<String>) -> Self {
        Self {
            target: JobTarget::Edit(job_id.into()),
        }
    }

    pub fn target(&self) -> &JobTarget {
        &self.target
    }

    /// Build the request body from validated fields
    pub fn draft(fields: &Fields) -> Result<JobDraft, ClientError> {
        let get = |name: &str| fields.get(name).cloned().unwrap_or_default();
        let salary = parse_number(&get("salary"))
            .ok_or_else(|| ClientError::Validation("Salary has to be a valid number!".to_string()))?;

        Ok(JobDraft {
            title: get("title"),
            company: get("company"),
            description: get("description"),
            location: get("location"),
            salary,
            job_type: get("jobType"),
            experience_level: get("experienceLevel"),
            skills: split_skills(&get("skills")),
            application_deadline: get("applicationDeadline").trim().to_string(),
            status: get("status"),
        })
    }

    /// Form values for an existing job: salary as text, skills joined with
    /// ", ", deadline reduced to `YYYY-MM-DD`
    pub fn values_from(job: &Job) -> Vec<(&'static str, String)> {
        vec![
            ("title", job.title.clone()),
            ("company", job.company.clone()),
            ("description", job.description.clone()),
            ("location", job.location.clone()),
            ("salary", job.salary.to_string()),
            ("jobType", job.job_type.clone()),
            ("experienceLevel", job.experience_level.clone()),
            ("skills", job.skills.join(", ")),
            (
                "applicationDeadline",
                job.application_deadline.format("%Y-%m-%d").to_string(),
            ),
            ("status", job.status.to_string()),
        ]
    }
}

#[async_trait]
impl FormKind for JobForm {
    type Output = Value;

    fn initial_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", String::new()),
            ("company", String::new()),
            ("description", String::new()),
            ("location", String::new()),
            ("salary", String::new()),
            ("jobType", String::new()),
            ("experienceLevel", String::new()),
            ("skills", String::new()),
            ("applicationDeadline", String::new()),
            ("status", JobStatus::Open.to_string()),
        ]
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    async fn submit(&self, api: &ApiClient, fields: &Fields) -> Result<Value, ClientError> {
        let draft = Self::draft(fields)?;
        match &self.target {
            JobTarget::Create => {
                let created: Value = api.send_json(Method::Post, "/jobs", &draft, true).await?;
                tracing::info!(title = %draft.title, "job created");
                Ok(created)
            }
            JobTarget::Edit(id) => {
                let path = job_path(id)?;
                let updated: Value = api.send_json(Method::Put, &path, &draft, true).await?;
                tracing::info!(job_id = %id, "job updated");
                Ok(updated)
            }
        }
    }

    fn success_message(&self) -> &'static str {
        match self.target {
            JobTarget::Create => "Job Added Successfully",
            JobTarget::Edit(_) => "Job Edited Successfully",
        }
    }

    fn failure_message(&self, err: &ClientError) -> String {
        let fallback = match self.target {
            JobTarget::Create => "Unable to Add the Job!",
            JobTarget::Edit(_) => "Unable to Edit the Job!",
        };
        match err {
            ClientError::NotAuthenticated | ClientError::Storage(_) | ClientError::Validation(_) => {
                err.user_message()
            }
            _ => err.server_message().unwrap_or(fallback).to_string(),
        }
    }
}

impl FormController<JobForm> {
    pub fn create_job() -> Self {
        Self::new(JobForm::create())
    }

    /// Edit form prefilled from a job already on screen
    pub fn edit_job(job: &Job) -> Self {
        Self::prefilled(JobForm::edit(job.id.clone()), JobForm::values_from(job))
    }

    /// Fetch the job with the session token and open an edit form for it
    pub async fn load_for_edit(api: &ApiClient, job_id: &str) -> Result<Self, ClientError> {
        let job: Job = api.get_json(&job_path(job_id)?, true).await?;
        Ok(Self::edit_job(&job))
    }
}
