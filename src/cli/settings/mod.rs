//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the [`SettingRegistry`]
//! maps keys typed on the command line to handlers. Handlers only touch the
//! in-memory [`Config`]; loading and saving happen in the caller.

pub mod error;
pub mod handlers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the words given after the key.
    ///
    /// Returns a success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value, returning a success message.
    fn unset(&self, config: &mut Config) -> String;
}
