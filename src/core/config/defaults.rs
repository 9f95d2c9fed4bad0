use crate::api::models::DEFAULT_MODEL;
use crate::core::chat::DEFAULT_BASE_URL;
use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;
use std::fs;

/// Overrides the configured API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// System preamble seeded into fresh conversations unless `preamble_file` is set.
pub const BUILTIN_PREAMBLE: &str = include_str!("../../prompt.md");

impl Config {
    /// Pick the model: explicit request, then configured default, then `gpt-4`.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        requested
            .filter(|model| !model.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.id().to_string())
    }

    pub fn resolve_base_url(&self) -> String {
        self.resolve_base_url_with(std::env::var(BASE_URL_ENV).ok())
    }

    pub(crate) fn resolve_base_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Read the system preamble once; callers hand it to the chat client.
    pub fn load_preamble(&self) -> Result<String, ConfigError> {
        match &self.preamble_file {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            }),
            None => Ok(BUILTIN_PREAMBLE.to_string()),
        }
    }
}
