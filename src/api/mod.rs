//! Job-board API client.
//!
//! Wraps a [`Transport`] with the base URL and the session store. The client
//! attaches the bearer token to authenticated calls and turns every outcome
//! into either the decoded JSON body or a [`ClientError`].

pub mod error;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use error::ClientError;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    /// Client backed by reqwest, configured from the `[api]` section
    pub fn from_config(config: &ApiConfig, session: SessionStore) -> Result<Self, ClientError> {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        let transport = ReqwestTransport::new(timeout).map_err(|e| ClientError::Network(e.0))?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport), session))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request to `<base-url><path>`.
    ///
    /// With `auth_required` the stored token is sent as a bearer token; when
    /// no token is stored the call fails with [`ClientError::NotAuthenticated`]
    /// and nothing is sent. A 2xx with an empty body yields `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth_required: bool,
    ) -> Result<Value, ClientError> {
        let bearer = if auth_required {
            match self.session.token()? {
                Some(token) => Some(token),
                None => {
                    tracing::warn!(%method, path, "authenticated request without a session token");
                    return Err(ClientError::NotAuthenticated);
                }
            }
        } else {
            None
        };

        let request = HttpRequest {
            method,
            url: self.url(path),
            bearer,
            body,
        };

        tracing::debug!(%method, url = %request.url, "sending request");
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "no response from server");
            ClientError::Network(e.0)
        })?;

        if response.is_success() {
            tracing::debug!(%method, path, status = response.status, "request succeeded");
            Ok(response.body.unwrap_or(Value::Null))
        } else {
            tracing::info!(%method, path, status = response.status, "request rejected");
            Err(ClientError::from_response(response.status, response.body.as_ref()))
        }
    }

    /// GET and decode into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, auth_required: bool) -> Result<T, ClientError> {
        let value = self.request(Method::Get, path, None, auth_required).await?;
        decode(value)
    }

    /// Send a JSON body and decode the response into `T`
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        auth_required: bool,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        let value = self.request(method, path, Some(body), auth_required).await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
