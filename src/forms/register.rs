//! Registration form.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::login::Credentials;
use super::{Fields, FormKind, Rule};
use crate::api::{ApiClient, ClientError, Method};
use crate::session::Role;

const RULES: &[Rule] = &[
    Rule::AllPresent {
        fields: &["username", "email", "password", "repeatPassword", "role"],
        message: "Please fill all fields!",
    },
    Rule::MinLength {
        field: "username",
        min: 2,
        message: "Username must be at least 2 characters!",
    },
    Rule::Email { field: "email" },
    Rule::MinLength {
        field: "password",
        min: 8,
        message: "Password must be at least 8 characters!",
    },
    Rule::HasUppercase {
        field: "password",
        message: "Password must contain at least one uppercase letter!",
    },
    Rule::SameAs {
        field: "password",
        other: "repeatPassword",
        message: "Passwords do not match!",
    },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    repeat_password: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    result: Credentials,
}

/// What a successful registration left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The backend returned credentials and they were saved
    SignedIn,
    /// Account created; the user still has to log in
    Registered,
}

/// Account creation. Any 2xx response counts as success.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterForm;

#[async_trait]
impl FormKind for RegisterForm {
    type Output = RegisterOutcome;

    fn initial_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", String::new()),
            ("email", String::new()),
            ("password", String::new()),
            ("repeatPassword", String::new()),
            ("role", Role::JobSeeker.to_string()),
        ]
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    async fn submit(&self, api: &ApiClient, fields: &Fields) -> Result<RegisterOutcome, ClientError> {
        let get = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");
        let body = RegisterRequest {
            username: get("username"),
            email: get("email"),
            password: get("password"),
            repeat_password: get("repeatPassword"),
            role: get("role"),
        };

        let response: Value = api.send_json(Method::Post, "/register", &body, false).await?;
        match serde_json::from_value::<RegisterResponse>(response) {
            Ok(RegisterResponse { result: creds }) => {
                api.session().save(&creds.token, &creds.user_id, creds.role)?;
                tracing::info!(user_id = %creds.user_id, "registered and signed in");
                Ok(RegisterOutcome::SignedIn)
            }
            Err(_) => {
                tracing::info!("registered");
                Ok(RegisterOutcome::Registered)
            }
        }
    }

    fn success_message(&self) -> &'static str {
        "Successful Register!"
    }

    fn failure_message(&self, err: &ClientError) -> String {
        match err {
            ClientError::Request { message, .. } if err.is_client_error() => message
                .clone()
                .unwrap_or_else(|| "Invalid contact details!".to_string()),
            ClientError::Storage(_) => err.user_message(),
            _ => "Network or server error, please try again later!".to_string(),
        }
    }
}
