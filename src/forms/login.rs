//! Login form.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Fields, FormKind, Rule};
use crate::api::{ApiClient, ClientError, Method};
use crate::session::{Role, Session};

const RULES: &[Rule] = &[
    Rule::AllPresent {
        fields: &["email", "password"],
        message: "Please fill all fields!",
    },
    Rule::Email { field: "email" },
];

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    result: Credentials,
}

/// Session values returned by the backend on login or registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Credentials {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

/// Email + password login. On success the returned credentials are saved to
/// the session store.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginForm;

#[async_trait]
impl FormKind for LoginForm {
    type Output = Session;

    fn initial_fields(&self) -> Vec<(&'static str, String)> {
        vec![("email", String::new()), ("password", String::new())]
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }

    async fn submit(&self, api: &ApiClient, fields: &Fields) -> Result<Session, ClientError> {
        let get = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");
        let body = LoginRequest {
            email: get("email"),
            password: get("password"),
        };

        let response: LoginResponse = api.send_json(Method::Post, "/login", &body, false).await?;
        let creds = response.result;
        api.session().save(&creds.token, &creds.user_id, creds.role)?;
        tracing::info!(user_id = %creds.user_id, role = %creds.role, "logged in");

        Ok(Session {
            token: Some(creds.token),
            user_id: Some(creds.user_id),
            role: Some(creds.role),
        })
    }

    fn success_message(&self) -> &'static str {
        "Successful Login!"
    }

    fn failure_message(&self, err: &ClientError) -> String {
        match err {
            ClientError::Request { .. } if err.is_client_error() => {
                "Email or Password Incorrect".to_string()
            }
            ClientError::Storage(_) => err.user_message(),
            _ => "Network or server error, please try again later!".to_string(),
        }
    }
}
