//! Scripted transport for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

use super::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::session::SessionStore;

pub(crate) const BASE_URL: &str = "http://test.local/api";

/// Replays queued outcomes in order and records every request it receives.
/// Sending with an empty queue is a transport failure.
#[derive(Default)]
pub(crate) struct FakeTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: Option<Value>) {
        self.outcomes
            .lock()
            .push_back(Ok(HttpResponse { status, body }));
    }

    pub(crate) fn fail(&self, reason: &str) {
        self.outcomes
            .lock()
            .push_back(Err(TransportError(reason.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn client(self: &Arc<Self>, session: SessionStore) -> ApiClient {
        ApiClient::new(BASE_URL, self.clone(), session)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no response queued".to_string())))
    }
}
