use crate::api::ChatRequest;
use crate::utils::auth::add_auth_headers;
use async_trait::async_trait;
use std::error::Error as StdError;

pub type TransportFailure = Box<dyn StdError + Send + Sync>;

/// Status and body of an HTTP exchange that reached the server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network seam of the chat client.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<RawResponse, TransportFailure>;
}

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<RawResponse, TransportFailure> {
        let http_request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        let http_request = add_auth_headers(http_request, credential);

        let response = http_request.json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
