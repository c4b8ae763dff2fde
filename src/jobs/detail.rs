//! Job detail screen state.

use crate::api::{ApiClient, ClientError};
use crate::notice::Notice;

use super::format::{format_date, format_salary};
use super::{job_path, Application, Job};

pub struct JobDetailViewModel {
    job: Job,
}

impl JobDetailViewModel {
    /// Fetch one job anonymously
    pub async fn load(api: &ApiClient, job_id: &str) -> Result<Self, ClientError> {
        let job: Job = api.get_json(&job_path(job_id)?, false).await?;
        tracing::debug!(job_id, "job details loaded");
        Ok(Self { job })
    }

    /// Notice shown when [`load`](Self::load) fails
    pub fn load_failed(err: &ClientError) -> Notice {
        Notice::from_error_or(err, "Unable to show Job details!")
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn applications(&self) -> &[Application] {
        self.job.applications()
    }

    pub fn application_count(&self) -> usize {
        self.job.applications().len()
    }

    /// Label/value pairs for the detail card, in display order
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let job = &self.job;
        vec![
            ("Company", job.company.clone()),
            ("Location", job.location.clone()),
            ("Job Type", job.job_type.clone()),
            ("Salary", format_salary(job.salary)),
            ("Experience", job.experience_level.clone()),
            ("Deadline", format_date(job.application_deadline)),
            ("Status", job.status.to_string()),
            ("Date of Creation", format_date(job.created_at)),
            ("Last Date of Modification", format_date(job.updated_at)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::jobs::sample_job_json;
    use crate::session::{Role, SessionStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_load_is_anonymous() {
        let session = SessionStore::in_memory();
        session.save("tok", "u", Role::JobSeeker).unwrap();
        let transport = FakeTransport::new();
        let mut body = sample_job_json("42", "Backend Engineer");
        body["applications"] = json!([
            { "_id": "a1", "userId": "x@y.com", "appliedAt": "2025-07-30T08:00:00Z" },
            { "_id": "a2", "userId": "z@y.com", "appliedAt": "2025-07-31T08:00:00Z" }
        ]);
        transport.respond(200, Some(body));
        let api = transport.client(session);

        let vm = JobDetailViewModel::load(&api, "42").await.unwrap();
        assert_eq!(vm.job().title, "Backend Engineer");
        assert_eq!(vm.application_count(), 2);
        assert_eq!(vm.applications()[1].user_id(), "z@y.com");

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://test.local/api/jobs/42");
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn test_summary_formats_fields() {
        let transport = FakeTransport::new();
        transport.respond(200, Some(sample_job_json("1", "Backend Engineer")));
        let api = transport.client(SessionStore::in_memory());

        let vm = JobDetailViewModel::load(&api, "1").await.unwrap();
        let summary = vm.summary();
        assert!(summary.contains(&("Salary", "$60,000".to_string())));
        assert!(summary.contains(&("Deadline", "31/08/2025".to_string())));
        assert!(summary.contains(&("Status", "Open".to_string())));
    }

    #[tokio::test]
    async fn test_load_failure_notice() {
        let transport = FakeTransport::new();
        transport.respond(404, Some(json!({"message": "Job not found"})));
        transport.fail("timeout");
        let api = transport.client(SessionStore::in_memory());

        let err = JobDetailViewModel::load(&api, "nope").await.err().unwrap();
        assert_eq!(JobDetailViewModel::load_failed(&err).message, "Job not found");

        let err = JobDetailViewModel::load(&api, "nope").await.err().unwrap();
        assert_eq!(
            JobDetailViewModel::load_failed(&err).message,
            "Unable to show Job details!"
        );
    }

    #[test]
    fn test_job_without_applications() {
        let transport = FakeTransport::new();
        transport.respond(200, Some(sample_job_json("7", "Designer")));
        let api = transport.client(SessionStore::in_memory());

        let vm = tokio_test::block_on(JobDetailViewModel::load(&api, "7")).unwrap();
        assert_eq!(vm.application_count(), 0);
        assert!(vm.applications().is_empty());
    }
}
