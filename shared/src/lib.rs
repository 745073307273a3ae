//! Wire protocol shared by the word-game server and client.
//!
//! Every server turn is answered with one fixed 8-byte record:
//!
//! | offset | width | field                                  |
//! |--------|-------|----------------------------------------|
//! | 0      | 1     | validity flag, `Y` or `N`              |
//! | 1      | 2     | guesses remaining, unsigned big-endian |
//! | 3      | 5     | result string                          |
//!
//! Guesses travel the other way as raw bytes with no length prefix. The
//! protocol relies on one transport write per guess and one read per
//! server turn; nothing here frames the client-to-server direction.

use bincode::Options;
use serde::{Deserialize, Serialize};

pub const WORD_LENGTH: usize = 5;
pub const MAX_GUESSES: u16 = 6;
pub const PACKET_SIZE: usize = 8;
/// Longest guess a single server read accepts. Clients must not send more
/// in one write, or the surplus is judged as extra guesses.
pub const MAX_GUESS_BYTES: usize = 64;

pub const VALID_FLAG: u8 = b'Y';
pub const INVALID_FLAG: u8 = b'N';

/// Result byte for a letter that does not score.
pub const ABSENT_MARK: u8 = b'-';
/// Result byte used in every position of an invalid-guess reply.
pub const INVALID_MARK: u8 = b'?';

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("expected a {PACKET_SIZE}-byte packet, got {0} bytes")]
    WrongLength(usize),

    #[error("unknown validity flag {0:#04x}")]
    UnknownFlag(u8),

    #[error("malformed packet: {0}")]
    Malformed(#[from] bincode::Error),
}

/// On-the-wire layout. Field order is the byte order of the record.
#[derive(Debug, Serialize, Deserialize)]
struct WirePacket {
    flag: u8,
    guesses_remaining: u16,
    result: [u8; WORD_LENGTH],
}

/// Fixed-width integers, network byte order, no trailing bytes.
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
        .reject_trailing_bytes()
}

/// One server-to-client reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub valid: bool,
    pub guesses_remaining: u16,
    pub result: [u8; WORD_LENGTH],
}

impl Packet {
    /// Reply to a guess that was rejected without consuming a turn.
    pub fn invalid(guesses_remaining: u16) -> Self {
        Self {
            valid: false,
            guesses_remaining,
            result: [INVALID_MARK; WORD_LENGTH],
        }
    }

    pub fn scored(guesses_remaining: u16, result: [u8; WORD_LENGTH]) -> Self {
        Self {
            valid: true,
            guesses_remaining,
            result,
        }
    }

    /// Serializes the reply into its 8-byte wire form.
    ///
    /// Fails only if the codec options stop producing a fixed-width record.
    pub fn encode(&self) -> Result<[u8; PACKET_SIZE], ProtocolError> {
        let wire = WirePacket {
            flag: if self.valid { VALID_FLAG } else { INVALID_FLAG },
            guesses_remaining: self.guesses_remaining,
            result: self.result,
        };

        let bytes = wire_options().serialize(&wire)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtocolError::WrongLength(bytes.len()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != PACKET_SIZE {
            return Err(ProtocolError::WrongLength(bytes.len()));
        }

        let wire: WirePacket = wire_options().deserialize(bytes)?;
        let valid = match wire.flag {
            VALID_FLAG => true,
            INVALID_FLAG => false,
            other => return Err(ProtocolError::UnknownFlag(other)),
        };

        Ok(Self {
            valid,
            guesses_remaining: wire.guesses_remaining,
            result: wire.result,
        })
    }

    /// The result bytes as text, with non-UTF-8 bytes replaced.
    pub fn result_str(&self) -> String {
        String::from_utf8_lossy(&self.result).into_owned()
    }
}

/// A result string wins when it is exactly five uppercase ASCII letters.
///
/// This is the only signal the client has for a win; the server never
/// sends an explicit outcome field.
pub fn is_winning_result(result: &[u8]) -> bool {
    result.len() == WORD_LENGTH && result.iter().all(|b| b.is_ascii_uppercase())
}
