//! Prompt input from standard input

use std::io::{self, IsTerminal, Read};

/// Read a prompt piped on stdin. Returns `None` when stdin is a terminal.
pub fn read_piped_prompt() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut prompt = String::new();
    stdin.lock().read_to_string(&mut prompt)?;
    Ok(Some(prompt))
}
