//! # Word Game Client Library
//!
//! A thin terminal client for the word-guessing server. It reads one guess
//! per line, sends each as a single raw write, waits for the server's
//! fixed 8-byte reply, and prints a transcript line for it.
//!
//! ## Module Organization
//!
//! - `input`: line-oriented guess reader; empty lines are skipped
//! - `transcript`: reply formatting and win/loss detection
//! - `network`: the connection and the send/receive loop
//! - `error`: client error type
//!
//! ## Win and Loss Detection
//!
//! The protocol carries no explicit outcome. The client infers a win from
//! an all-uppercase result spelling its guess, and a loss from a valid
//! reply reporting zero guesses remaining.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use wordle_client::network::Client;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("127.0.0.1", 8192).await?;
//!     let stdin = BufReader::new(tokio::io::stdin());
//!     let outcome = client.play(stdin, &mut std::io::stdout()).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod input;
pub mod network;
pub mod transcript;
