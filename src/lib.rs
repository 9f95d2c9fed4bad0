//! h asks an OpenAI chat model a question from the terminal and keeps the
//! conversation on disk so the next invocation can pick it up again.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state, the chat client, the saved
//!   conversation store and user configuration.
//! - [`api`] defines the chat completion payloads and the supported models.
//! - [`auth`] finds the API key.
//! - [`cli`] parses arguments and runs one exchange or a settings command.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod logging;
pub mod utils;
