//! Form state controller.
//!
//! One controller type, [`FormController`], drives every form. A
//! [`FormKind`] supplies the field set, the ordered rule list and the single
//! API call made on submit.
//!
//! ```text
//! Editing -> Validating -> Submitting -> Succeeded
//!                 |             |
//!                 +--> Failed <-+        (next edit returns to Editing)
//! ```

pub mod job;
pub mod login;
pub mod register;
pub mod validation;

pub use job::{JobForm, JobTarget};
pub use login::LoginForm;
pub use register::{RegisterForm, RegisterOutcome};
pub use validation::Rule;

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

use crate::api::{ApiClient, ClientError};
use crate::notice::Notice;

/// Field name to raw user input
pub type Fields = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What a particular form collects and where it sends it
#[async_trait]
pub trait FormKind: Send + Sync {
    type Output: Send;

    /// Field names with their initial values, in display order
    fn initial_fields(&self) -> Vec<(&'static str, String)>;

    /// Ordered validation rules; only the first violation is reported
    fn rules(&self) -> &'static [Rule];

    /// Assemble the payload and issue exactly one API call.
    /// Only called after the rules passed.
    async fn submit(&self, api: &ApiClient, fields: &Fields) -> Result<Self::Output, ClientError>;

    fn success_message(&self) -> &'static str;

    fn failure_message(&self, err: &ClientError) -> String {
        err.user_message()
    }
}

pub struct FormController<K: FormKind> {
    kind: K,
    fields: Fields,
    phase: FormPhase,
    focused: Option<String>,
    revealed: BTreeSet<String>,
    notice: Option<Notice>,
}

impl<K: FormKind> FormController<K> {
    pub fn new(kind: K) -> Self {
        let fields = initial(&kind);
        Self {
            kind,
            fields,
            phase: FormPhase::Editing,
            focused: None,
            revealed: BTreeSet::new(),
            notice: None,
        }
    }

    /// Start from the initial fields overlaid with `values`
    pub fn prefilled<I, N, V>(kind: K, values: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::new(kind);
        for (name, value) in values {
            form.fields.insert(name.into(), value.into());
        }
        form
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Current value of a field, empty when unset
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Replace one field. Editing after a failure returns to `Editing` with
    /// the other fields untouched.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
        if matches!(self.phase, FormPhase::Failed(_)) {
            self.phase = FormPhase::Editing;
        }
    }

    pub fn focus(&mut self, name: &str) {
        self.focused = Some(name.to_string());
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Flip password visibility for `name`; returns the new state
    pub fn toggle_reveal(&mut self, name: &str) -> bool {
        if !self.revealed.remove(name) {
            self.revealed.insert(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_revealed(&self, name: &str) -> bool {
        self.revealed.contains(name)
    }

    /// Run the rule list and return the first violation, if any
    pub fn validate(&self) -> Result<(), String> {
        validation::first_violation(self.kind.rules(), &self.fields)
    }

    /// Validate, then send. A validation failure makes no network call.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<K::Output, ClientError> {
        self.phase = FormPhase::Validating;
        if let Err(message) = self.validate() {
            tracing::debug!(%message, "form validation failed");
            self.fail(message.clone());
            return Err(ClientError::Validation(message));
        }

        self.phase = FormPhase::Submitting;
        let result = self.kind.submit(api, &self.fields).await;
        match result {
            Ok(output) => {
                self.phase = FormPhase::Succeeded;
                self.notice = Some(Notice::success(self.kind.success_message()));
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(error = %err, "form submission failed");
                let message = self.kind.failure_message(&err);
                self.fail(message);
                Err(err)
            }
        }
    }

    /// Dismiss a success: reset the form and return to `Editing`
    pub fn acknowledge(&mut self) {
        if self.phase == FormPhase::Succeeded {
            self.fields = initial(&self.kind);
            self.focused = None;
            self.revealed.clear();
            self.notice = None;
            self.phase = FormPhase::Editing;
        }
    }

    /// Notice produced by the last submit
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn fail(&mut self, message: String) {
        self.notice = Some(Notice::error(message.clone()));
        self.phase = FormPhase::Failed(message);
    }
}

fn initial<K: FormKind>(kind: &K) -> Fields {
    kind.initial_fields()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::api::Method;
    use crate::session::SessionStore;
    use serde_json::json;

    /// Two-field form that posts to /echo
    struct EchoForm;

    #[async_trait]
    impl FormKind for EchoForm {
        type Output = serde_json::Value;

        fn initial_fields(&self) -> Vec<(&'static str, String)> {
            vec![("name", String::new()), ("secret", String::new())]
        }

        fn rules(&self) -> &'static [Rule] {
            &[Rule::AllPresent {
                fields: &["name", "secret"],
                message: "Please fill all fields!",
            }]
        }

        async fn submit(&self, api: &ApiClient, fields: &Fields) -> Result<Self::Output, ClientError> {
            api.request(Method::Post, "/echo", Some(json!(fields)), false).await
        }

        fn success_message(&self) -> &'static str {
            "Echoed"
        }
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_call() {
        let transport = FakeTransport::new();
        let api = transport.client(SessionStore::in_memory());
        let mut form = FormController::new(EchoForm);
        form.set_field("name", "x");

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m == "Please fill all fields!"));
        assert_eq!(form.phase(), &FormPhase::Failed("Please fill all fields!".into()));
        assert_eq!(form.notice(), Some(&Notice::error("Please fill all fields!")));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_edit_after_failure_keeps_input() {
        let transport = FakeTransport::new();
        let api = transport.client(SessionStore::in_memory());
        let mut form = FormController::new(EchoForm);
        form.set_field("name", "kept");
        let _ = form.submit(&api).await;

        form.set_field("secret", "s");
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.field("name"), "kept");
    }

    #[tokio::test]
    async fn test_success_then_acknowledge_resets() {
        let transport = FakeTransport::new();
        transport.respond(200, Some(json!({"ok": true})));
        let api = transport.client(SessionStore::in_memory());
        let mut form = FormController::new(EchoForm);
        form.set_field("name", "n");
        form.set_field("secret", "s");
        form.toggle_reveal("secret");

        let out = form.submit(&api).await.unwrap();
        assert_eq!(out, json!({"ok": true}));
        assert_eq!(form.phase(), &FormPhase::Succeeded);
        assert_eq!(transport.requests().len(), 1);

        form.acknowledge();
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.field("name"), "");
        assert!(!form.is_revealed("secret"));
        assert!(form.notice().is_none());
    }

    #[tokio::test]
    async fn test_server_failure_moves_to_failed() {
        let transport = FakeTransport::new();
        transport.respond(500, None);
        let api = transport.client(SessionStore::in_memory());
        let mut form = FormController::prefilled(EchoForm, [("name", "n"), ("secret", "s")]);

        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            form.phase(),
            &FormPhase::Failed("Unable to reach the server, please try again later!".into())
        );
        assert_eq!(form.field("secret"), "s");
    }

    #[test]
    fn test_ui_state_never_touches_fields() {
        let mut form = FormController::new(EchoForm);
        form.focus("secret");
        assert_eq!(form.focused(), Some("secret"));
        assert!(form.toggle_reveal("secret"));
        assert!(form.is_revealed("secret"));
        assert!(!form.toggle_reveal("secret"));
        form.blur();
        assert_eq!(form.focused(), None);
        assert_eq!(form.fields().len(), 2);
    }

    #[test]
    fn test_acknowledge_ignored_unless_succeeded() {
        let mut form = FormController::new(EchoForm);
        form.set_field("name", "x");
        form.acknowledge();
        assert_eq!(form.field("name"), "x");
    }
}
