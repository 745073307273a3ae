//! The immutable word list every session draws from and validates against.

use crate::error::ServerError;
use log::{info, warn};
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use wordle_shared::WORD_LENGTH;

/// Words are kept in dictionary order for `choose`, and in a set for
/// membership checks. Built once, then shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    /// Reads up to `num_words` valid words from a newline-delimited file.
    pub fn load(path: &Path, num_words: usize) -> Result<Self, ServerError> {
        let bytes = std::fs::read(path).map_err(|source| ServerError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;

        let vocabulary = Self::parse(&bytes, num_words);
        if vocabulary.is_empty() {
            return Err(ServerError::EmptyVocabulary {
                path: path.to_path_buf(),
            });
        }

        info!("opened {} ({} words)", path.display(), vocabulary.len());
        if vocabulary.len() < num_words {
            warn!(
                "{} holds only {} valid words ({} requested)",
                path.display(),
                vocabulary.len(),
                num_words
            );
        }

        Ok(vocabulary)
    }

    /// Scans dictionary text, keeping lines of exactly five ASCII letters.
    ///
    /// Lines are case-folded to lowercase and a trailing `\r` is ignored.
    /// Scanning stops once `num_words` words have been collected.
    pub fn parse(bytes: &[u8], num_words: usize) -> Self {
        let words = bytes
            .split(|b| *b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| line.len() == WORD_LENGTH && line.iter().all(u8::is_ascii_alphabetic))
            .map(|line| String::from_utf8_lossy(line).to_ascii_lowercase())
            .take(num_words);

        Self::from_words(words)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let index = words.iter().cloned().collect();
        Self { words, index }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Picks a hidden word uniformly at random.
    ///
    /// Returns `None` only for an empty vocabulary, which `load` refuses to
    /// build.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.words.len());
        Some(&self.words[index])
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
