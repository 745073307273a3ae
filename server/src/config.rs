//! Command-line arguments and validated server configuration.

use crate::error::ServerError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default cap on concurrent sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Networked word-guessing game server
///
/// Send SIGUSR1 to shut the server down cleanly. SIGINT, SIGTERM and
/// SIGUSR2 are ignored.
#[derive(Parser, Debug)]
#[command(author, version, about, allow_negative_numbers = true)]
pub struct Args {
    /// Port to listen on
    pub port: i64,

    /// Seed for the hidden-word generator
    pub seed: i64,

    /// Dictionary file, one word per line
    pub dictionary: PathBuf,

    /// Number of 5-letter words to load from the dictionary
    pub num_words: i64,

    /// Address to bind to
    #[arg(long = "bind", default_value = "0.0.0.0")]
    pub host: String,

    /// Maximum number of concurrent sessions; extra connections are refused
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Abandon a session after this many seconds without a guess
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}

/// Configuration the server runs with, after validation.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub seed: u64,
    pub dictionary: PathBuf,
    pub num_words: usize,
    pub max_sessions: usize,
    /// `None` means a silent client holds its session until it disconnects
    /// or the server shuts down.
    pub idle_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TryFrom<Args> for ServerConfig {
    type Error = ServerError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let port = u16::try_from(args.port)
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| ServerError::config(format!("invalid port {}", args.port)))?;

        let seed = u64::try_from(args.seed)
            .map_err(|_| ServerError::config(format!("invalid seed {}", args.seed)))?;

        let num_words = usize::try_from(args.num_words)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ServerError::config(format!("invalid number of words {}", args.num_words))
            })?;

        if args.max_sessions == 0 {
            return Err(ServerError::config("max sessions must be at least 1"));
        }

        let idle_timeout = match args.idle_timeout {
            Some(0) => return Err(ServerError::config("idle timeout must be positive")),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            host: args.host,
            port,
            seed,
            dictionary: args.dictionary,
            num_words,
            max_sessions: args.max_sessions,
            idle_timeout,
        })
    }
}
