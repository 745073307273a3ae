//! # Word Game Server Library
//!
//! This library provides the server side of a networked word-guessing game.
//! Each TCP connection gets its own independent game against a hidden
//! five-letter word, scored over the fixed 8-byte protocol defined in
//! `wordle_shared`.
//!
//! ## Core Responsibilities
//!
//! ### One Session Per Connection
//! Every accepted connection is handed to its own worker task. Workers never
//! talk to each other; the only state they share is a handful of small
//! registries, each behind its own lock.
//!
//! ### Shared Registries
//! - Statistics: total guesses, wins and losses
//! - Hidden-word ledger: one entry per session, revealed at shutdown
//! - Session registry: live worker handles, used for the capacity cap and
//!   for shutdown
//!
//! A worker holds at most one of these locks at a time and never nests
//! them, so lock ordering cannot deadlock.
//!
//! ### Coordinated Shutdown
//! On a stop request the server stops accepting, cancels every worker at
//! its receive point, joins them all, and only then uppercases and
//! releases the ledger. Cancellation never lands mid-scoring or while a
//! worker holds a lock.
//!
//! ## Module Organization
//!
//! - `config`: command-line arguments and validation
//! - `error`: startup and per-session error types
//! - `vocabulary`: the immutable word list
//! - `stats`, `ledger`, `registry`: the shared registries
//! - `game`: per-session state machine and scoring
//! - `session`: the per-connection worker
//! - `network`: connection acceptor and shutdown coordinator
//! - `signals`: process signal handling
//!
//! ## Protocol Caveat
//!
//! Guesses are sent as raw bytes with no length prefix. The server treats
//! each read as one guess, which holds as long as the client writes one
//! guess per send and waits for the reply before sending the next.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use wordle_server::config::ServerConfig;
//! use wordle_server::network::Server;
//! use wordle_server::vocabulary::Vocabulary;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8192,
//!         seed: 111,
//!         dictionary: "words.txt".into(),
//!         num_words: 5000,
//!         max_sessions: 256,
//!         idle_timeout: None,
//!     };
//!     let vocabulary = Vocabulary::load(&config.dictionary, config.num_words)?;
//!
//!     let server = Server::bind(config, vocabulary).await?;
//!     let report = server
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!
//!     println!("hidden words this run: {:?}", report.hidden_words);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod ledger;
pub mod network;
pub mod registry;
pub mod session;
pub mod signals;
pub mod stats;
pub mod vocabulary;
