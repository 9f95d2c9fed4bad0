//! Conversation state: the ordered, role-tagged turns sent to the chat API.
//!
//! A conversation begins with a single system message carrying the preamble.
//! After that, user and assistant turns alternate. The append operations
//! enforce the alternation, and a persisted conversation is only accepted if
//! it holds complete user/assistant exchanges.

use crate::core::message::{Message, Role};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Message>", into = "Vec<Message>")]
pub struct Conversation {
    messages: Vec<Message>,
}

impl TryFrom<Vec<Message>> for Conversation {
    type Error = String;

    /// An optional leading system message, then `user`/`assistant` pairs.
    fn try_from(messages: Vec<Message>) -> Result<Self, Self::Error> {
        let turns = match messages.first() {
            Some(first) if first.role == Role::System => &messages[1..],
            _ => &messages[..],
        };

        for (offset, message) in turns.iter().enumerate() {
            let expected = if offset % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            if message.role != expected {
                let position = offset + messages.len() - turns.len();
                return Err(format!(
                    "expected {expected} message at position {position}, found {}",
                    message.role
                ));
            }
        }

        if turns.len() % 2 != 0 {
            return Err("last user message has no assistant reply".to_string());
        }

        Ok(Self { messages })
    }
}

impl From<Conversation> for Vec<Message> {
    fn from(conversation: Conversation) -> Self {
        conversation.messages
    }
}

/// Raised when an append would break user/assistant alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOrderError {
    pub attempted: Role,
    pub last: Option<Role>,
}

impl fmt::Display for TurnOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(last) => write!(
                f,
                "cannot append {} turn after {} turn",
                self.attempted, last
            ),
            None => write!(
                f,
                "cannot append {} turn to an empty conversation",
                self.attempted
            ),
        }
    }
}

impl StdError for TurnOrderError {}

/// Errors that can occur when reading a persisted conversation.
#[derive(Debug)]
pub enum ConversationError {
    /// The payload was present but is not a JSON array of messages.
    Malformed(serde_json::Error),
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::Malformed(source) => {
                write!(f, "Saved conversation is malformed: {source}")
            }
        }
    }
}

impl StdError for ConversationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConversationError::Malformed(source) => Some(source),
        }
    }
}

impl Conversation {
    /// Start a fresh conversation seeded with the system preamble.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(preamble)],
        }
    }

    /// Parse a persisted conversation.
    ///
    /// Blank input or an empty array means there is nothing to resume and
    /// yields `Ok(None)`. Anything else must parse as a message array made of
    /// complete exchanges.
    pub fn load(raw: &str) -> Result<Option<Self>, ConversationError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let conversation: Self =
            serde_json::from_str(raw).map_err(ConversationError::Malformed)?;
        Ok(Some(conversation).filter(|conversation| !conversation.is_empty()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) -> Result<(), TurnOrderError> {
        match self.last_role() {
            Some(Role::User) => Err(self.order_error(Role::User)),
            _ => {
                self.messages.push(Message::user(text));
                Ok(())
            }
        }
    }

    pub fn append_assistant_turn(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(), TurnOrderError> {
        match self.last_role() {
            Some(Role::User) => {
                self.messages.push(Message::assistant(text));
                Ok(())
            }
            _ => Err(self.order_error(Role::Assistant)),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn last_role(&self) -> Option<Role> {
        self.messages.last().map(|message| message.role)
    }

    fn order_error(&self, attempted: Role) -> TurnOrderError {
        TurnOrderError {
            attempted,
            last: self.last_role(),
        }
    }
}
