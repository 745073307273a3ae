//! Reading guesses from the player, one per line.

use log::warn;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use wordle_shared::MAX_GUESS_BYTES;

/// Cuts `guess` to at most `MAX_GUESS_BYTES`, on a character boundary.
fn clip(guess: &str) -> &str {
    if guess.len() <= MAX_GUESS_BYTES {
        return guess;
    }
    let mut end = MAX_GUESS_BYTES;
    while !guess.is_char_boundary(end) {
        end -= 1;
    }
    &guess[..end]
}

/// Yields non-empty lines with their terminators stripped.
pub struct GuessReader<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> GuessReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Returns the next guess, or `None` once input is exhausted.
    ///
    /// Empty lines are skipped rather than sent, since an empty write would
    /// look like nothing at all to the server. Lines longer than one server
    /// read are truncated so each guess still gets exactly one reply.
    pub async fn next_guess(&mut self) -> io::Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            let guess = line.trim_end_matches(|c| c == '\r' || c == '\n');
            if guess.is_empty() {
                continue;
            }
            let clipped = clip(guess);
            if clipped.len() < guess.len() {
                warn!(
                    "guess of {} bytes truncated to {}",
                    guess.len(),
                    clipped.len()
                );
            }
            return Ok(Some(clipped.to_string()));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skips_empty_lines_and_strips_terminators() {
        let mut reader = GuessReader::new(&b"\ncrane\r\n\r\n\ntrace\nllama"[..]);

        assert_eq!(reader.next_guess().await.unwrap().as_deref(), Some("crane"));
        assert_eq!(reader.next_guess().await.unwrap().as_deref(), Some("trace"));
        assert_eq!(reader.next_guess().await.unwrap().as_deref(), Some("llama"));
        assert_eq!(reader.next_guess().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keeps_guess_text_verbatim() {
        let mut reader = GuessReader::new(&b"  CrAnE \n"[..]);
        assert_eq!(
            reader.next_guess().await.unwrap().as_deref(),
            Some("  CrAnE ")
        );
    }

    #[tokio::test]
    async fn test_overlong_line_is_truncated() {
        let mut input = "x".repeat(100);
        input.push_str("\ncrane\n");
        let mut reader = GuessReader::new(input.as_bytes());

        let first = reader.next_guess().await.unwrap().unwrap();
        assert_eq!(first.len(), MAX_GUESS_BYTES);
        assert_eq!(reader.next_guess().await.unwrap().as_deref(), Some("crane"));
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let guess = format!("{}é", "a".repeat(MAX_GUESS_BYTES - 1));
        assert_eq!(clip(&guess).len(), MAX_GUESS_BYTES - 1);
        assert_eq!(clip("crane"), "crane");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut reader = GuessReader::new(&b""[..]);
        assert_eq!(reader.next_guess().await.unwrap(), None);
    }
}
