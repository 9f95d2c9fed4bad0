//! The default command: send one prompt, print the reply, save the conversation

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::auth::resolve_credential;
use crate::core::chat::{
    AskError, AskErrorKind, ChatClient, ChatClientConfig, ChatTransport, Reply,
};
use crate::core::config::{data_dir, Config};
use crate::core::store::{ConversationStore, StoreError};
use crate::utils::editor::{compose_prompt, is_usable_prompt};
use crate::utils::input::read_piped_prompt;
use crate::utils::logging::LoggingState;

pub struct AskOptions {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub continue_conversation: bool,
    pub log_file: Option<PathBuf>,
}

/// Why a single exchange did not produce a reply.
#[derive(Debug)]
pub enum ExchangeError {
    /// The saved conversation file could not be read.
    Store(StoreError),
    Ask(AskError),
}

impl std::fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeError::Store(err) => write!(f, "{err}"),
            ExchangeError::Ask(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExchangeError::Store(err) => Some(err),
            ExchangeError::Ask(err) => Some(err),
        }
    }
}

impl ExchangeError {
    pub fn is_malformed_conversation(&self) -> bool {
        matches!(self, ExchangeError::Ask(err) if err.kind() == AskErrorKind::MalformedConversation)
    }
}

/// Load the prior conversation when continuing, then ask.
///
/// A corrupt saved conversation stops the exchange before any request is
/// made with [`AskError::MalformedConversation`]; only a missing or empty
/// record starts afresh.
pub async fn exchange<T: ChatTransport>(
    client: &ChatClient<T>,
    store: &ConversationStore,
    prompt: &str,
    model: &str,
    continue_conversation: bool,
) -> Result<Reply, ExchangeError> {
    let prior = if continue_conversation {
        match store.load() {
            Ok(prior) => prior,
            Err(StoreError::Malformed { path, source }) => {
                debug!(path = %path.display(), "Saved conversation is malformed");
                return Err(ExchangeError::Ask(AskError::from(source)));
            }
            Err(err) => return Err(ExchangeError::Store(err)),
        }
    } else {
        None
    };
    if continue_conversation && prior.is_none() {
        debug!("Nothing to continue; starting a new conversation");
    }

    client
        .ask(prompt, model, prior)
        .await
        .map_err(ExchangeError::Ask)
}

pub async fn run_ask(options: AskOptions) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let data_dir = data_dir()?;
    fs::create_dir_all(&data_dir)?;

    let credential = match resolve_credential(&data_dir) {
        Ok(credential) => credential,
        Err(err) => {
            eprintln!("❌ Error: {err}");
            eprintln!();
            eprintln!("💡 Quick fixes:");
            for fix in err.quick_fixes() {
                eprintln!("  • {fix}");
            }
            std::process::exit(1);
        }
    };
    debug!(source = ?credential.source, "Resolved API key");

    let logging = LoggingState::new(options.log_file)?;

    let prompt = match options.prompt {
        Some(prompt) => Some(prompt),
        None => match read_piped_prompt()? {
            Some(prompt) => Some(prompt),
            None => compose_prompt(&data_dir)?,
        },
    };
    let Some(prompt) = prompt.filter(|prompt| is_usable_prompt(prompt)) else {
        eprintln!("❌ Error: No prompt given. Use -p, pipe text on stdin, or write it in the editor.");
        std::process::exit(1);
    };

    let model = config.resolve_model(options.model.as_deref());
    let client = ChatClient::new(ChatClientConfig {
        credential: credential.token,
        base_url: config.resolve_base_url(),
        preamble: config.load_preamble()?,
    });
    let store = ConversationStore::in_dir(&data_dir);

    let reply = match exchange(
        &client,
        &store,
        &prompt,
        &model,
        options.continue_conversation,
    )
    .await
    {
        Ok(reply) => reply,
        Err(err) => {
            debug!(error = ?err, "Exchange failed");
            eprintln!("❌ Error: {err}");
            if err.is_malformed_conversation() {
                eprintln!("   File: {}", store.path().display());
                eprintln!("   Run without -c to start a new conversation.");
            }
            std::process::exit(1);
        }
    };

    println!("{}", reply.content);

    if let Err(err) = logging.log_exchange(&prompt, &reply.content) {
        warn!(error = %err, "Failed to write transcript");
        eprintln!("Failed to log message: {err}");
    }

    store.save(&reply.conversation)?;
    Ok(())
}
