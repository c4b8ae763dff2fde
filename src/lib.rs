//! Client library for a job-board REST API.
//!
//! - [`session`]: persisted login state (token, user id, role)
//! - [`api`]: HTTP client that attaches the session token and maps failures
//!   into [`api::ClientError`]
//! - [`forms`]: login, register and job forms with ordered validation
//! - [`jobs`]: job model plus the list and detail view models
//! - [`notice`]: user-visible success/error notifications

pub mod api;
pub mod cli;
pub mod config;
pub mod forms;
pub mod jobs;
pub mod notice;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use config::Config;
pub use notice::Notice;
pub use session::SessionStore;
