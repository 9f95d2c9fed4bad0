//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::models::list_models;
use crate::cli::ask::{run_ask, AskOptions};
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::config::Config;
use crate::logging::init_tracing;

#[derive(Parser)]
#[command(name = "h", version)]
#[command(about = "Query GPT from the terminal")]
#[command(
    long_about = "h sends a prompt to an OpenAI chat model and prints the reply. \
Every exchange is saved so the next invocation can continue it with -c.\n\n\
Prompt sources, in order:\n\
  -p/--prompt       The prompt text\n\
  stdin             When input is piped\n\
  $EDITOR           Otherwise an editor opens (defaults to vi)\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your OpenAI API key (falls back to the api_key file in the data directory)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  H_DATA_DIR        Where conversations, prompts and the api_key file live\n\
  H_LOG             Diagnostic log filter, e.g. debug"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use, or list supported models if no model specified
    #[arg(short = 'm', long, value_name = "MODEL", num_args = 0..=1, default_missing_value = "")]
    pub model: Option<String>,

    /// The prompt to send
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Continue from the last conversation
    #[arg(short = 'c', long = "continue")]
    pub continue_conversation: bool,

    /// Append prompts and replies to a transcript file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set configuration values, or print them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Set { key: None, .. }) => {
            Config::load()?.print_all();
            Ok(())
        }
        Some(Commands::Set {
            key: Some(key),
            value,
        }) => update_config(|registry, config| {
            let handler = registry
                .get(&key)
                .ok_or_else(|| SettingError::UnknownKey(key.clone()))?;
            handler.set(&value, config)
        }),
        Some(Commands::Unset { key }) => update_config(|registry, config| {
            let handler = registry
                .get(&key)
                .ok_or_else(|| SettingError::UnknownKey(key.clone()))?;
            Ok(handler.unset(config))
        }),
        None => match args.model.as_deref() {
            Some("") => {
                list_models();
                Ok(())
            }
            model => {
                run_ask(AskOptions {
                    prompt: args.prompt,
                    model: model.map(str::to_string),
                    continue_conversation: args.continue_conversation,
                    log_file: args.log,
                })
                .await
            }
        },
    }
}

fn update_config<F>(apply: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&SettingRegistry, &mut Config) -> Result<String, SettingError>,
{
    let registry = SettingRegistry::new();
    let mut config = Config::load()?;

    match apply(&registry, &mut config) {
        Ok(message) => {
            config.save()?;
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            if matches!(err, SettingError::UnknownKey(_)) {
                eprintln!(
                    "Available keys: {}",
                    registry.keys().collect::<Vec<_>>().join(", ")
                );
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;
