//! HTTP transport seam.
//!
//! The [`ApiClient`](super::ApiClient) builds a complete [`HttpRequest`] and
//! hands it to a [`Transport`]. Status interpretation stays in the client so
//! every transport reports the raw outcome only.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// HTTP verbs used by the job-board API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A fully built request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Token for the `Authorization: Bearer` header
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Raw response: status plus the decoded body, if there was one
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was received
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the underlying client. `timeout` of `None` means requests wait
    /// indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(concat!("jobboard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| e.to_string());
        Ok(finish_response(status, bytes))
    }
}

/// Build the response once a status has arrived. A body that fails to read
/// is treated as absent; the status is kept.
fn finish_response<B: AsRef<[u8]>>(status: u16, body: Result<B, String>) -> HttpResponse {
    let body = match body {
        Ok(bytes) => decode_body(bytes.as_ref()),
        Err(reason) => {
            tracing::warn!(status, %reason, "failed to read response body");
            None
        }
    };
    HttpResponse { status, body }
}

/// JSON when it parses, otherwise the raw text as a JSON string
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body_json() {
        assert_eq!(decode_body(br#"{"a":1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn test_decode_body_empty() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
    }

    #[test]
    fn test_decode_body_plain_text() {
        assert_eq!(decode_body(b"Unauthorized"), Some(json!("Unauthorized")));
    }

    #[test]
    fn test_unreadable_body_keeps_status() {
        let response = finish_response::<Vec<u8>>(404, Err("connection closed".to_string()));
        assert_eq!(response, HttpResponse { status: 404, body: None });
        assert!(!response.is_success());

        let response = finish_response(200, Ok(br#"{"ok":true}"#.to_vec()));
        assert_eq!(response.body, Some(json!({"ok": true})));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
