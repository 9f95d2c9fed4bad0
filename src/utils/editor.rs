//! External editor integration
//!
//! When no prompt is given on the command line, the prompt is composed in
//! `$EDITOR` (falling back to `vi`). The file lives in the data directory and
//! is renamed after the first words of the prompt so earlier prompts stay
//! easy to find.

use chrono::{DateTime, SecondsFormat, Utc};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

pub const PLACEHOLDER: &str = "Replace this file with your prompt.";
const DEFAULT_EDITOR: &str = "vi";
const NAME_WORDS: usize = 5;

/// Returns `None` when the draft was left empty or untouched; the draft is
/// removed in that case.
pub fn compose_prompt(data_dir: &Path) -> Result<Option<String>, Box<dyn Error>> {
    let editor = match std::env::var("EDITOR") {
        Ok(editor) if !editor.trim().is_empty() => editor,
        _ => DEFAULT_EDITOR.to_string(),
    };

    fs::create_dir_all(data_dir)?;
    let draft_path = prompt_file_path(data_dir, Utc::now(), "");
    fs::write(&draft_path, PLACEHOLDER)?;

    // EDITOR may carry arguments, e.g. "code --wait"
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(DEFAULT_EDITOR);
    debug!(editor = %editor, path = %draft_path.display(), "Opening editor");
    let status = Command::new(program)
        .args(parts)
        .arg(&draft_path)
        .status()?;

    if !status.success() {
        return Err(format!("Editor exited with status: {status}").into());
    }

    Ok(keep_draft(data_dir, &draft_path, Utc::now())?)
}

/// A prompt is usable unless it is blank or still the placeholder.
pub fn is_usable_prompt(prompt: &str) -> bool {
    let trimmed = prompt.trim();
    !trimmed.is_empty() && trimmed != PLACEHOLDER
}

/// Rename a finished draft after its first words, or delete an abandoned one.
fn keep_draft(
    data_dir: &Path,
    draft_path: &Path,
    timestamp: DateTime<Utc>,
) -> io::Result<Option<String>> {
    let prompt = fs::read_to_string(draft_path)?;
    if !is_usable_prompt(&prompt) {
        debug!(path = %draft_path.display(), "Discarding untouched prompt draft");
        fs::remove_file(draft_path)?;
        return Ok(None);
    }

    let saved_path = prompt_file_path(data_dir, timestamp, &prompt);
    fs::rename(draft_path, &saved_path)?;
    eprintln!("Saving prompt to: {}", saved_path.display());

    Ok(Some(prompt.trim_end().to_string()))
}

/// `prompt_<timestamp>_<first words>.txt` inside `data_dir`.
pub fn prompt_file_path(data_dir: &Path, timestamp: DateTime<Utc>, prompt: &str) -> PathBuf {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(|c: char| c == ':' || c == '.', "-");
    let words = prompt
        .split_whitespace()
        .take(NAME_WORDS)
        .map(sanitize_file_name)
        .collect::<Vec<_>>()
        .join("-");

    data_dir.join(format!("prompt_{stamp}_{words}.txt"))
}

fn sanitize_file_name(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' => '#',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}
