//! Word files for the puzzle builder.
//!
//! A word file holds one word per line. Blank lines and lines starting
//! with `#` are skipped; words are uppercased and anything outside A-Z is
//! dropped by [`WordList::new`].

use std::path::Path;

use compression_ciphers_core::WordList;
use tracing::{debug, warn};

/// Parse word-file text into a list.
pub fn parse_words(text: &str) -> WordList {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    let list = WordList::new(lines.iter().copied());
    if list.len() < lines.len() {
        warn!(skipped = lines.len() - list.len(), "word file has entries outside A-Z");
    }
    list
}

/// Load a word file, failing if it holds no usable word.
pub fn load_word_list(path: &Path) -> Result<WordList, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let list = parse_words(&text);
    if list.is_empty() {
        return Err(format!("{} contains no A-Z words", path.display()));
    }
    debug!(path = %path.display(), words = list.len(), "word file loaded");
    Ok(list)
}
