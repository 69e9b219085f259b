//! Save-as prompt on the terminal.

use pagegrab_core::downloads::DestinationPrompt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Asks on stdin where to save each download. An empty answer accepts the
/// suggestion, `skip` (or EOF) cancels, anything else is a path; an existing
/// directory keeps the suggested filename.
pub struct StdinPrompt;

impl DestinationPrompt for StdinPrompt {
    fn confirm(&self, suggested: &Path) -> Option<PathBuf> {
        print!("Save as [{}]: ", suggested.display());
        let _ = io::stdout().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => resolve_answer(&answer, suggested),
        }
    }
}

pub(crate) fn resolve_answer(answer: &str, suggested: &Path) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(suggested.to_path_buf());
    }
    if answer.eq_ignore_ascii_case("skip") {
        return None;
    }
    let chosen = PathBuf::from(answer);
    match suggested.file_name() {
        Some(name) if chosen.is_dir() => Some(chosen.join(name)),
        _ => Some(chosen),
    }
}
