//! Handlers for the individual configuration keys.

use crate::api::models::SupportedModel;
use crate::cli::settings::{SettingError, SettingHandler};
use crate::core::config::data::{path_display, Config};
use std::fs;
use std::path::PathBuf;

fn single_value(
    args: &[String],
    hint: &'static str,
    example: &'static str,
) -> Result<String, SettingError> {
    let value = args.join(" ");
    if value.trim().is_empty() {
        return Err(SettingError::MissingArgs { hint, example });
    }
    Ok(value.trim().to_string())
}

/// Handler for the `default-model` setting.
pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = single_value(
            args,
            "To set a default model, specify the model:",
            "h set default-model gpt-3.5-turbo",
        )?;
        let model: SupportedModel = value
            .parse()
            .map_err(|_| SettingError::UnknownModel(value.clone()))?;

        config.default_model = Some(model.id().to_string());
        Ok(format!("✅ Set default-model to: {model}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.default_model = None;
        "✅ Unset default-model".to_string()
    }
}

/// Handler for the `base-url` setting.
pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = single_value(
            args,
            "To set the API base URL, specify it:",
            "h set base-url https://api.openai.com/v1",
        )?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(SettingError::InvalidValue {
                key: "base-url",
                reason: format!("expected an http:// or https:// URL, got '{value}'"),
            });
        }

        config.base_url = Some(value.clone());
        Ok(format!("✅ Set base-url to: {value}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        "✅ Unset base-url".to_string()
    }
}

/// Handler for the `preamble-file` setting.
pub struct PreambleFileHandler;

impl SettingHandler for PreambleFileHandler {
    fn key(&self) -> &'static str {
        "preamble-file"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = single_value(
            args,
            "To replace the built-in preamble, specify a file:",
            "h set preamble-file ~/notes/prompt.md",
        )?;
        let given = PathBuf::from(value);
        let not_a_file = || SettingError::InvalidValue {
            key: "preamble-file",
            reason: format!("{} is not a readable file", path_display(&given)),
        };
        if !given.is_file() {
            return Err(not_a_file());
        }
        // Stored absolute so it resolves the same from any working directory
        let path = fs::canonicalize(&given).map_err(|_| not_a_file())?;

        let message = format!("✅ Set preamble-file to: {}", path_display(&path));
        config.preamble_file = Some(path);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.preamble_file = None;
        "✅ Unset preamble-file (using the built-in preamble)".to_string()
    }
}
