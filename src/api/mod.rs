use crate::core::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal marker the provider stops generating at.
pub const STOP_SEQUENCE: &str = "END_OF_MESSAGE";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub stop: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: &[Message]) -> Self {
        Self {
            model: model.into(),
            stop: STOP_SEQUENCE.to_string(),
            messages: messages.iter().map(ChatMessage::from).collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseChoice {
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

/// Completion body. Only the shape we read is typed; the raw choice is kept
/// separately for diagnostics.
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Value>>,
}

impl ChatResponse {
    pub fn first_choice(&self) -> Option<&Value> {
        self.choices.as_ref().and_then(|choices| choices.first())
    }
}

/// Pull a human-readable summary out of a provider error body.
///
/// Providers disagree on the shape: OpenAI nests it as `error.message`, some
/// proxies send `error` as a bare string, others a top-level `message`.
pub fn extract_error_summary(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_model_stop_and_ordered_messages() {
        let messages = [Message::system("pre"), Message::user("hi")];
        let request = ChatRequest::new("gpt-4", &messages);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4",
                "stop": "END_OF_MESSAGE",
                "messages": [
                    {"role": "system", "content": "pre"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn error_summary_handles_provider_shapes() {
        assert_eq!(
            extract_error_summary(r#"{"error":{"message":"invalid api key","type":"auth"}}"#)
                .as_deref(),
            Some("invalid api key")
        );
        assert_eq!(
            extract_error_summary(r#"{"error":"rate   limited"}"#).as_deref(),
            Some("rate limited")
        );
        assert_eq!(
            extract_error_summary(r#"{"message":"overloaded"}"#).as_deref(),
            Some("overloaded")
        );
        assert_eq!(extract_error_summary(r#"{"status":"failed"}"#), None);
        assert_eq!(extract_error_summary("<html>bad gateway</html>"), None);
    }

    #[test]
    fn response_without_choices_has_no_first_choice() {
        let missing: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.first_choice().is_none());

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(empty.first_choice().is_none());
    }
}
