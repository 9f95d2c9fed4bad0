use crate::api::models::UnknownModel;
use crate::core::conversation::{ConversationError, TurnOrderError};
use std::error::Error as StdError;
use std::fmt;

/// Broad failure categories for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskErrorKind {
    UnsupportedModel,
    MissingCredential,
    MalformedConversation,
    TurnOrder,
    Transport,
    Protocol,
}

/// Errors surfaced by [`ChatClient::ask`](super::ChatClient::ask).
#[derive(Debug)]
pub enum AskError {
    /// The requested model is not on the allow-list. Raised before any I/O.
    UnsupportedModel(UnknownModel),

    /// The bearer token was empty. Raised before any I/O.
    MissingCredential,

    /// A persisted conversation could not be parsed.
    MalformedConversation(ConversationError),

    /// The prior conversation does not end where a user turn may follow.
    TurnOrder(TurnOrderError),

    /// The HTTP exchange failed: connection error or non-success status.
    Transport {
        url: String,
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        /// Provider error message, or the raw body when none could be found.
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The exchange succeeded but the body lacked completion content.
    Protocol {
        url: String,
        /// Raw first choice, or the whole body when there was no choice.
        payload: String,
    },
}

impl AskError {
    pub fn kind(&self) -> AskErrorKind {
        match self {
            AskError::UnsupportedModel(_) => AskErrorKind::UnsupportedModel,
            AskError::MissingCredential => AskErrorKind::MissingCredential,
            AskError::MalformedConversation(_) => AskErrorKind::MalformedConversation,
            AskError::TurnOrder(_) => AskErrorKind::TurnOrder,
            AskError::Transport { .. } => AskErrorKind::Transport,
            AskError::Protocol { .. } => AskErrorKind::Protocol,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AskError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::UnsupportedModel(err) => write!(f, "{err}"),
            AskError::MissingCredential => write!(f, "No API key was provided"),
            AskError::MalformedConversation(err) => write!(f, "{err}"),
            AskError::TurnOrder(err) => write!(f, "Conversation cannot continue: {err}"),
            AskError::Transport {
                url,
                status: Some(status),
                message,
                ..
            } => write!(
                f,
                "Request to {url} failed with status {status}: {message}"
            ),
            AskError::Transport {
                url,
                status: None,
                message,
                ..
            } => write!(f, "Request to {url} failed: {message}"),
            AskError::Protocol { url, payload } => write!(
                f,
                "Expected a reply from {url}, but got this instead:\n{payload}"
            ),
        }
    }
}

impl StdError for AskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AskError::UnsupportedModel(err) => Some(err),
            AskError::MalformedConversation(err) => Some(err),
            AskError::TurnOrder(err) => Some(err),
            AskError::Transport {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<UnknownModel> for AskError {
    fn from(err: UnknownModel) -> Self {
        AskError::UnsupportedModel(err)
    }
}

impl From<ConversationError> for AskError {
    fn from(err: ConversationError) -> Self {
        AskError::MalformedConversation(err)
    }
}

impl From<TurnOrderError> for AskError {
    fn from(err: TurnOrderError) -> Self {
        AskError::TurnOrder(err)
    }
}
