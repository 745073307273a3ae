use crate::vocabulary::Vocabulary;
use wordle_shared::{ABSENT_MARK, MAX_GUESSES, WORD_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGuess,
    Scoring,
    Won,
    Lost,
    Abandoned,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Won | SessionState::Lost | SessionState::Abandoned
        )
    }
}

/// Per-position verdict for a scored guess. Letters are the guess letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterScore {
    Correct(u8),
    Present(u8),
    Absent,
}

impl LetterScore {
    /// Correct letters are sent uppercase, misplaced ones lowercase.
    pub fn to_wire(self) -> u8 {
        match self {
            LetterScore::Correct(letter) => letter.to_ascii_uppercase(),
            LetterScore::Present(letter) => letter.to_ascii_lowercase(),
            LetterScore::Absent => ABSENT_MARK,
        }
    }
}

/// Scores `guess` against `hidden`. Both must be lowercase.
///
/// Exact matches are resolved first and consume their hidden letter.
/// Letters missing from the hidden word entirely are then marked absent.
/// Each remaining position takes the first unconsumed matching hidden
/// letter, so a hidden letter is credited to at most one guess position.
pub fn score_guess(
    guess: &[u8; WORD_LENGTH],
    hidden: &[u8; WORD_LENGTH],
) -> [LetterScore; WORD_LENGTH] {
    let mut scores: [Option<LetterScore>; WORD_LENGTH] = [None; WORD_LENGTH];
    let mut used = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess[i] == hidden[i] {
            scores[i] = Some(LetterScore::Correct(guess[i]));
            used[i] = true;
        }
    }

    for i in 0..WORD_LENGTH {
        if scores[i].is_none() && !hidden.contains(&guess[i]) {
            scores[i] = Some(LetterScore::Absent);
        }
    }

    for i in 0..WORD_LENGTH {
        if scores[i].is_some() {
            continue;
        }
        let unused_match = (0..WORD_LENGTH).find(|&j| !used[j] && hidden[j] == guess[i]);
        scores[i] = Some(match unused_match {
            Some(j) => {
                used[j] = true;
                LetterScore::Present(guess[i])
            }
            None => LetterScore::Absent,
        });
    }

    scores.map(|score| score.unwrap_or(LetterScore::Absent))
}

pub fn encode_result(scores: &[LetterScore; WORD_LENGTH]) -> [u8; WORD_LENGTH] {
    scores.map(LetterScore::to_wire)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Won,
    Lost,
}

/// What a single received guess did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Wrong length or not in the vocabulary. No guess consumed.
    Invalid { guesses_remaining: u16 },
    Scored {
        result: [u8; WORD_LENGTH],
        guesses_remaining: u16,
        outcome: TurnOutcome,
    },
}

/// One player's game against one hidden word.
#[derive(Debug, Clone)]
pub struct GameSession {
    hidden_word: [u8; WORD_LENGTH],
    guesses_remaining: u16,
    state: SessionState,
}

impl GameSession {
    /// Returns `None` unless `hidden_word` is exactly five ASCII letters.
    pub fn new(hidden_word: &str) -> Option<Self> {
        let bytes: [u8; WORD_LENGTH] = hidden_word.as_bytes().try_into().ok()?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }

        Some(Self {
            hidden_word: bytes.map(|b| b.to_ascii_lowercase()),
            guesses_remaining: MAX_GUESSES,
            state: SessionState::AwaitingGuess,
        })
    }

    /// Applies one received guess. `raw` is exactly the bytes read, so its
    /// length is the length of the guess.
    pub fn submit(&mut self, raw: &[u8], vocabulary: &Vocabulary) -> Turn {
        let Some(guess) = self.validate(raw, vocabulary) else {
            return Turn::Invalid {
                guesses_remaining: self.guesses_remaining,
            };
        };

        self.state = SessionState::Scoring;
        let scores = score_guess(&guess, &self.hidden_word);
        self.guesses_remaining = self.guesses_remaining.saturating_sub(1);

        let outcome = if scores.iter().all(|s| matches!(s, LetterScore::Correct(_))) {
            self.state = SessionState::Won;
            TurnOutcome::Won
        } else if self.guesses_remaining == 0 {
            self.state = SessionState::Lost;
            TurnOutcome::Lost
        } else {
            self.state = SessionState::AwaitingGuess;
            TurnOutcome::Continue
        };

        let result = match outcome {
            TurnOutcome::Lost => self.reveal_bytes(),
            _ => encode_result(&scores),
        };

        Turn::Scored {
            result,
            guesses_remaining: self.guesses_remaining,
            outcome,
        }
    }

    fn validate(&self, raw: &[u8], vocabulary: &Vocabulary) -> Option<[u8; WORD_LENGTH]> {
        if self.state != SessionState::AwaitingGuess {
            return None;
        }
        let guess: [u8; WORD_LENGTH] = raw.try_into().ok()?;
        let guess = guess.map(|b| b.to_ascii_lowercase());
        let word = std::str::from_utf8(&guess).ok()?;
        vocabulary.contains(word).then_some(guess)
    }

    /// The player left before the game reached an outcome.
    pub fn abandon(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Abandoned;
        }
    }

    fn reveal_bytes(&self) -> [u8; WORD_LENGTH] {
        self.hidden_word.map(|b| b.to_ascii_uppercase())
    }

    /// The hidden word in uppercase, as shown when a game ends.
    pub fn reveal(&self) -> String {
        String::from_utf8_lossy(&self.reveal_bytes()).into_owned()
    }

    pub fn hidden_word(&self) -> String {
        String::from_utf8_lossy(&self.hidden_word).into_owned()
    }

    pub fn guesses_remaining(&self) -> u16 {
        self.guesses_remaining
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
