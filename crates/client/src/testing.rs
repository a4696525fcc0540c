//! Scripted [`Transport`] for unit tests.

use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Records every request and answers with queued responses in order.
///
/// With [`MockTransport::holding`], the first request waits for a notification before it
/// settles; later requests answer at once.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(release: Arc<Notify>) -> Self {
        Self {
            hold: Mutex::new(Some(release)),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: ApiResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        let hold = self.hold.lock().unwrap().take();
        if let Some(release) = hold {
            release.notified().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ApiResponse::new(500, "no scripted response")))
    }
}
