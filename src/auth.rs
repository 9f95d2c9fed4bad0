//! Credential resolution
//!
//! The API key comes from `OPENAI_API_KEY` when it is set, otherwise from an
//! `api_key` file in the data directory. Both are trimmed; an empty value
//! counts as missing.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_KEY_FILE_NAME: &str = "api_key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    File(PathBuf),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub source: CredentialSource,
}

// The token must never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug)]
pub enum AuthError {
    Missing { file: PathBuf },
    Read { path: PathBuf, source: io::Error },
}

impl AuthError {
    /// Suggestions printed under the error message.
    pub fn quick_fixes(&self) -> Vec<String> {
        match self {
            AuthError::Missing { file } => vec![
                format!("export {API_KEY_ENV}=\"your-api-key-here\""),
                format!("echo \"your-api-key-here\" > {}", file.display()),
            ],
            AuthError::Read { path, .. } => {
                vec![format!("Check the permissions of {}", path.display())]
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Missing { file } => write!(
                f,
                "No API key found. Set {API_KEY_ENV} or write the key to {}",
                file.display()
            ),
            AuthError::Read { path, source } => {
                write!(f, "Failed to read API key from {}: {source}", path.display())
            }
        }
    }
}

impl StdError for AuthError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AuthError::Missing { .. } => None,
            AuthError::Read { source, .. } => Some(source),
        }
    }
}

pub fn resolve_credential(data_dir: &Path) -> Result<Credential, AuthError> {
    resolve_credential_with(std::env::var(API_KEY_ENV).ok(), data_dir)
}

pub(crate) fn resolve_credential_with(
    env_value: Option<String>,
    data_dir: &Path,
) -> Result<Credential, AuthError> {
    if let Some(token) = env_value.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Using API key from {API_KEY_ENV}");
        return Ok(Credential {
            token: token.to_string(),
            source: CredentialSource::Environment,
        });
    }

    let file = data_dir.join(API_KEY_FILE_NAME);
    let contents = match fs::read_to_string(&file) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(AuthError::Missing { file });
        }
        Err(source) => return Err(AuthError::Read { path: file, source }),
    };

    let token = contents.trim();
    if token.is_empty() {
        return Err(AuthError::Missing { file });
    }

    debug!(path = %file.display(), "Using API key from file");
    Ok(Credential {
        token: token.to_string(),
        source: CredentialSource::File(file),
    })
}
