use crate::api::ChatRequest;
use crate::core::chat::{ChatTransport, RawResponse, TransportFailure};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// (url, credential, request body) as seen by the transport.
pub type RecordedRequest = (String, String, Value);

/// Transport that answers every request with one canned response and
/// records what it was sent.
pub struct RecordingTransport {
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
    response: Result<RawResponse, String>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            response: Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            response: Err(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a request should have been sent")
    }
}

#[async_trait::async_trait]
impl ChatTransport for &RecordingTransport {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            url.to_string(),
            credential.to_string(),
            serde_json::to_value(request).unwrap(),
        ));
        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(message.clone().into()),
        }
    }
}

/// A well-formed chat completion body whose first choice says `content`.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}
