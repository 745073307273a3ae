use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("\"{}\" could not be opened", path.display())]
    Dictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("\"{}\" contains no 5-letter words", path.display())]
    EmptyVocabulary { path: PathBuf },

    #[error("bind() failed on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServerError {
    pub fn config(reason: impl Into<String>) -> Self {
        ServerError::Config {
            reason: reason.into(),
        }
    }
}

/// Errors that end a single session. Never fatal to the server.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to send reply to {peer}")]
    Send {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to receive guess from {peer}")]
    Receive {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// The session registry is full; the connection is turned away.
#[derive(Debug, thiserror::Error)]
#[error("server full ({max_sessions} live sessions)")]
pub struct CapacityExceeded {
    pub max_sessions: usize,
}
