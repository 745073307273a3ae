//! Human-readable rendering of server replies.

use wordle_shared::{is_winning_result, Packet};

/// What a reply means for the game, as far as the client can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Won,
    Lost,
}

/// Classifies a reply to `guess`.
///
/// The protocol has no outcome field. A win is an all-uppercase result; a
/// loss is a valid reply with no guesses left. The final losing reply also
/// reveals the hidden word in uppercase, so an uppercase result only counts
/// as a win when it spells the guess that was sent.
pub fn classify(packet: &Packet, guess: &str) -> Outcome {
    if !packet.valid {
        return Outcome::Continue;
    }

    let spells_guess = packet.result.eq_ignore_ascii_case(guess.as_bytes());
    if is_winning_result(&packet.result) && spells_guess {
        Outcome::Won
    } else if packet.guesses_remaining == 0 {
        Outcome::Lost
    } else {
        Outcome::Continue
    }
}

/// The transcript line for one reply.
pub fn describe(packet: &Packet) -> String {
    let remaining = packet.guesses_remaining;
    if packet.valid {
        format!(
            "CLIENT: response: {} -- {} guesses remaining",
            packet.result_str(),
            remaining
        )
    } else {
        format!("CLIENT: invalid guess -- {} guesses remaining", remaining)
    }
}

pub fn announce(outcome: Outcome, packet: &Packet) -> Option<String> {
    match outcome {
        Outcome::Won => Some("CLIENT: you won!".to_string()),
        Outcome::Lost => Some(format!(
            "CLIENT: you lost! the word was {}",
            packet.result_str()
        )),
        Outcome::Continue => None,
    }
}
