//! Chat request client
//!
//! One [`ChatClient::ask`] call performs exactly one request/response exchange
//! with the chat completions endpoint: append the prompt as a user turn, post
//! the whole conversation, validate the reply, append it as an assistant
//! turn. Nothing is retried and nothing is written to disk here.

mod error;
mod transport;

pub use error::{AskError, AskErrorKind};
pub use transport::{ChatTransport, HttpTransport, RawResponse, TransportFailure};

use crate::api::models::SupportedModel;
use crate::api::{extract_error_summary, ChatRequest, ChatResponse, ChatResponseChoice};
use crate::core::conversation::Conversation;
use crate::utils::url::construct_api_url;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Everything a client needs to talk to the provider.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub credential: String,
    pub base_url: String,
    /// System message seeded into every fresh conversation.
    pub preamble: String,
}

/// The assistant's reply and the conversation it completed.
#[derive(Debug, Clone)]
pub struct Reply {
    pub content: String,
    pub conversation: Conversation,
}

pub struct ChatClient<T = HttpTransport> {
    config: ChatClientConfig,
    transport: T,
}

impl ChatClient<HttpTransport> {
    pub fn new(config: ChatClientConfig) -> Self {
        Self::with_transport(config, HttpTransport::default())
    }
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn with_transport(config: ChatClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn fresh_conversation(&self) -> Conversation {
        Conversation::new(self.config.preamble.clone())
    }

    pub fn chat_url(&self) -> String {
        construct_api_url(&self.config.base_url, "chat/completions")
    }

    /// Send `prompt` as the next user turn and return the assistant's reply.
    ///
    /// Without a `prior` conversation a fresh one is started from the
    /// preamble. On failure the working conversation is dropped.
    pub async fn ask(
        &self,
        prompt: &str,
        model: &str,
        prior: Option<Conversation>,
    ) -> Result<Reply, AskError> {
        let model: SupportedModel = model.parse()?;
        if self.config.credential.trim().is_empty() {
            return Err(AskError::MissingCredential);
        }

        let mut conversation = prior.unwrap_or_else(|| self.fresh_conversation());
        conversation.append_user_turn(prompt)?;

        let request = ChatRequest::new(model.id(), conversation.messages());
        let url = self.chat_url();
        debug!(
            url = %url,
            model = %model,
            messages = request.messages.len(),
            "Sending chat request"
        );

        let response = self
            .transport
            .post_json(&url, &self.config.credential, &request)
            .await
            .map_err(|source| AskError::Transport {
                url: url.clone(),
                status: None,
                message: source.to_string(),
                source: Some(source),
            })?;
        debug!(status = response.status, bytes = response.body.len(), "Chat response received");

        if !response.is_success() {
            let message = extract_error_summary(&response.body)
                .unwrap_or_else(|| response.body.trim().to_string());
            return Err(AskError::Transport {
                url,
                status: Some(response.status),
                message,
                source: None,
            });
        }

        let content = extract_reply(&url, &response.body)?;
        conversation.append_assistant_turn(content.clone())?;

        Ok(Reply {
            content,
            conversation,
        })
    }
}

fn extract_reply(url: &str, body: &str) -> Result<String, AskError> {
    let protocol_error = |payload: String| AskError::Protocol {
        url: url.to_string(),
        payload,
    };

    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|_| protocol_error(body.to_string()))?;
    let Some(raw_choice) = parsed.first_choice() else {
        return Err(protocol_error(body.to_string()));
    };

    let choice: Option<ChatResponseChoice> = serde_json::from_value(raw_choice.clone()).ok();
    match choice.and_then(|choice| choice.message?.content) {
        Some(content) => Ok(content),
        None => {
            let payload = serde_json::to_string_pretty(raw_choice)
                .unwrap_or_else(|_| raw_choice.to_string());
            Err(protocol_error(payload))
        }
    }
}
