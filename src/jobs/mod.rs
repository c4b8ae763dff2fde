//! Job records as served by the backend, plus the screens that display them.
//!
//! Jobs are owned by the backend. The client only holds copies fetched per
//! screen visit and submits edits wholesale.

pub mod detail;
pub mod format;
pub mod list;

pub use detail::JobDetailViewModel;
pub use list::{Confirmation, JobAction, JobListViewModel};

use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::api::ClientError;

lazy_static! {
    static ref JOB_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(JobStatus::Open),
            "Closed" => Ok(JobStatus::Closed),
            other => Err(format!("Unknown job status: {}", other)),
        }
    }
}

/// A posted position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub status: JobStatus,
    pub salary: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub application_deadline: DateTime<Utc>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
    #[serde(default)]
    applications: Vec<Application>,
}

impl Job {
    /// Applications received so far. Read-only on the client.
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Case-insensitive substring match over title, company, location and
    /// skills. `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.company.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
            || self.skills.iter().any(|s| s.to_lowercase().contains(needle))
    }
}

/// One application to a job. Only ever produced by deserializing a
/// server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "appliedAt", deserialize_with = "flexible_datetime")]
    applied_at: DateTime<Utc>,
}

impl Application {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }
}

/// Request body for creating or replacing a job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    #[serde(serialize_with = "serialize_salary")]
    pub salary: f64,
    pub job_type: String,
    pub experience_level: String,
    pub skills: Vec<String>,
    pub application_deadline: String,
    pub status: String,
}

/// Whole salaries go out as JSON integers, fractional ones as floats
fn serialize_salary<S: Serializer>(salary: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if salary.fract() == 0.0 && salary.abs() <= MAX_EXACT {
        serializer.serialize_i64(*salary as i64)
    } else {
        serializer.serialize_f64(*salary)
    }
}

/// API path of one job. Ids are restricted to `[A-Za-z0-9_-]` so they stay a
/// single path segment.
pub fn job_path(job_id: &str) -> Result<String, ClientError> {
    if !JOB_ID_REGEX.is_match(job_id) {
        return Err(ClientError::Validation("Invalid Job id!".to_string()));
    }
    Ok(format!("/jobs/{}", job_id))
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn flexible_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

#[cfg(test)]
pub(crate) fn sample_job_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "title": title,
        "company": "Acme",
        "description": "Build things",
        "location": "Tunis",
        "jobType": "Full-time",
        "experienceLevel": "Mid",
        "status": "Open",
        "salary": 60000,
        "skills": ["Rust", "Go"],
        "applicationDeadline": "2025-08-31T00:00:00.000Z",
        "createdAt": "2025-07-27T09:37:27.495Z",
        "updatedAt": "2025-07-28T10:00:00.000Z",
        "applications": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_path_accepts_object_ids() {
        assert_eq!(job_path("64c2f1a9e4b0a1b2c3d4e5f6").unwrap(), "/jobs/64c2f1a9e4b0a1b2c3d4e5f6");
        assert_eq!(job_path("job_1-a").unwrap(), "/jobs/job_1-a");
    }

    #[test]
    fn test_job_path_rejects_other_segments() {
        for id in ["", "../register", "42/applications", "42?x=1", "42#frag", "..", "a b"] {
            assert!(
                matches!(job_path(id), Err(ClientError::Validation(ref m)) if m == "Invalid Job id!"),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_deserialize_backend_job() {
        let mut value = sample_job_json("42", "Backend Engineer");
        value["postedBy"] = json!("admin-1");
        value["applications"] = json!([
            { "_id": "a1", "userId": "someone@example.com", "appliedAt": "2025-07-29T12:00:00Z" }
        ]);

        let job: Job = serde_json::from_value(value).unwrap();
        assert_eq!(job.id, "42");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.salary, 60000.0);
        assert_eq!(job.posted_by.as_deref(), Some("admin-1"));
        assert_eq!(job.applications().len(), 1);
        assert_eq!(job.applications()[0].user_id(), "someone@example.com");
        assert_eq!(job.applications()[0].id(), "a1");
    }

    #[test]
    fn test_deserialize_accepts_plain_id_and_date() {
        let mut value = sample_job_json("ignored", "Designer");
        let obj = value.as_object_mut().unwrap();
        obj.remove("_id");
        obj.insert("id".into(), json!("7"));
        obj.insert("applicationDeadline".into(), json!("2025-12-01"));
        obj.remove("applications");

        let job: Job = serde_json::from_value(value).unwrap();
        assert_eq!(job.id, "7");
        assert_eq!(job.application_deadline.format("%Y-%m-%d").to_string(), "2025-12-01");
        assert!(job.applications().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_bad_date() {
        let mut value = sample_job_json("1", "x");
        value["createdAt"] = json!("yesterday");
        assert!(serde_json::from_value::<Job>(value).is_err());
    }

    #[test]
    fn test_draft_salary_serialization() {
        let mut draft = JobDraft {
            title: "t".into(),
            company: "c".into(),
            description: "d".into(),
            location: "l".into(),
            salary: 50000.0,
            job_type: "Full-time".into(),
            experience_level: "Mid".into(),
            skills: vec!["Rust".into()],
            application_deadline: "2025-09-01".into(),
            status: "Open".into(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["salary"], json!(50000));
        assert_eq!(value["jobType"], json!("Full-time"));
        assert_eq!(value["applicationDeadline"], json!("2025-09-01"));

        draft.salary = 1234.5;
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["salary"], json!(1234.5));
    }

    #[test]
    fn test_matches_lowercase() {
        let job: Job = serde_json::from_value(sample_job_json("1", "Backend Engineer")).unwrap();
        assert!(job.matches_lowercase("backend"));
        assert!(job.matches_lowercase("acme"));
        assert!(job.matches_lowercase("tunis"));
        assert!(job.matches_lowercase("rust"));
        assert!(job.matches_lowercase(""));
        assert!(!job.matches_lowercase("python"));
    }
}
