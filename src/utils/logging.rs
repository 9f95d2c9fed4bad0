//! Plain-text transcript of prompts and replies (`--log <file>`).

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct LoggingState {
    file_path: Option<PathBuf>,
}

impl LoggingState {
    /// Enable logging to `log_file`, failing early if it cannot be written.
    pub fn new(log_file: Option<PathBuf>) -> io::Result<Self> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }

        Ok(LoggingState {
            file_path: log_file,
        })
    }

    pub fn log_message(&self, content: &str) -> io::Result<()> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }

        // Blank line between messages
        writeln!(writer)?;

        writer.flush()
    }

    pub fn log_exchange(&self, prompt: &str, reply: &str) -> io::Result<()> {
        self.log_message(&format!("You: {prompt}"))?;
        self.log_message(reply)
    }
}

fn test_file_access(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()
}
