//! The per-connection worker that drives one game to its end.
//!
//! A worker only suspends in two places: waiting for the next guess, and
//! writing a reply. Shutdown cancellation is observed solely at the first
//! of these, so a worker is never interrupted while scoring or while it
//! holds the statistics or ledger lock.

use crate::error::SessionError;
use crate::game::{GameSession, Turn, TurnOutcome};
use crate::ledger::HiddenWordLedger;
use crate::registry::SessionId;
use crate::stats::StatisticsRegistry;
use crate::vocabulary::Vocabulary;
use log::{debug, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use wordle_shared::{Packet, MAX_GUESS_BYTES};

/// Largest guess read in one go. Longer input is split across reads and
/// each piece is judged as its own (invalid) guess.
pub const RECEIVE_BUFFER_SIZE: usize = MAX_GUESS_BYTES;

/// Shared state every worker gets a handle to.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub vocabulary: Arc<Vocabulary>,
    pub stats: Arc<StatisticsRegistry>,
    pub ledger: Arc<HiddenWordLedger>,
    pub idle_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    Disconnected,
    IdleTimeout,
    Shutdown,
    SendFailed,
    ReceiveFailed,
}

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Won,
    Lost,
    Abandoned(AbandonReason),
}

enum Received {
    Guess(usize),
    Cancelled,
    IdleTimeout,
    Failed(io::Error),
}

async fn idle(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}

async fn send_packet<S>(stream: &mut S, packet: &Packet) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let bytes = packet
        .encode()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    stream.write_all(&bytes).await?;
    stream.flush().await
}

fn plural(guesses: u16) -> &'static str {
    if guesses == 1 {
        "guess"
    } else {
        "guesses"
    }
}

/// Plays one game over `stream` and returns how it ended.
///
/// The hidden word is appended to the ledger before the first receive.
/// Losses are counted for every early end except shutdown cancellation.
pub async fn run_session<S>(
    id: SessionId,
    peer: SocketAddr,
    mut stream: S,
    mut game: GameSession,
    ctx: SessionContext,
    cancel: CancellationToken,
) -> SessionEnd
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    ctx.ledger.record(&game.hidden_word()).await;
    debug!("session {}: hidden word chosen for {}", id, peer);

    let mut buffer = [0u8; RECEIVE_BUFFER_SIZE];

    let end = loop {
        debug!("session {}: waiting for guess", id);

        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => Received::Cancelled,
            _ = idle(ctx.idle_timeout) => Received::IdleTimeout,
            read = stream.read(&mut buffer) => match read {
                Ok(n) => Received::Guess(n),
                Err(e) => Received::Failed(e),
            },
        };

        let len = match received {
            Received::Guess(0) => {
                info!("session {}: client gave up; closing TCP connection...", id);
                break SessionEnd::Abandoned(AbandonReason::Disconnected);
            }
            Received::Guess(len) => len,
            Received::Cancelled => {
                info!("session {}: cancelled by server shutdown", id);
                break SessionEnd::Abandoned(AbandonReason::Shutdown);
            }
            Received::IdleTimeout => {
                info!("session {}: no guess within idle timeout", id);
                break SessionEnd::Abandoned(AbandonReason::IdleTimeout);
            }
            Received::Failed(source) => {
                let err = SessionError::Receive { peer, source };
                warn!("session {}: {}", id, err);
                break SessionEnd::Abandoned(AbandonReason::ReceiveFailed);
            }
        };

        let raw = &buffer[..len];
        info!(
            "session {}: rcvd guess: {}",
            id,
            String::from_utf8_lossy(raw).to_lowercase()
        );

        match game.submit(raw, &ctx.vocabulary) {
            Turn::Invalid { guesses_remaining } => {
                let packet = Packet::invalid(guesses_remaining);
                info!(
                    "session {}: invalid guess; sending reply: {} ({} {} left)",
                    id,
                    packet.result_str(),
                    guesses_remaining,
                    plural(guesses_remaining)
                );
                if let Err(source) = send_packet(&mut stream, &packet).await {
                    warn!("session {}: {}", id, SessionError::Send { peer, source });
                    break SessionEnd::Abandoned(AbandonReason::SendFailed);
                }
            }
            Turn::Scored {
                result,
                guesses_remaining,
                outcome,
            } => {
                ctx.stats.record_guess().await;
                let end = match outcome {
                    TurnOutcome::Won => {
                        ctx.stats.record_win().await;
                        Some(SessionEnd::Won)
                    }
                    TurnOutcome::Lost => {
                        ctx.stats.record_loss().await;
                        Some(SessionEnd::Lost)
                    }
                    TurnOutcome::Continue => None,
                };

                let packet = Packet::scored(guesses_remaining, result);
                info!(
                    "session {}: sending reply: {} ({} {} left)",
                    id,
                    packet.result_str(),
                    guesses_remaining,
                    plural(guesses_remaining)
                );

                if let Err(source) = send_packet(&mut stream, &packet).await {
                    warn!("session {}: {}", id, SessionError::Send { peer, source });
                    // A decided game keeps its outcome even if the reply is lost.
                    break end.unwrap_or(SessionEnd::Abandoned(AbandonReason::SendFailed));
                }

                if let Some(end) = end {
                    break end;
                }
            }
        }
    };

    if let SessionEnd::Abandoned(reason) = end {
        game.abandon();
        if reason != AbandonReason::Shutdown {
            ctx.stats.record_loss().await;
        }
    }
    info!("session {}: game over; word was {}!", id, game.reveal());

    if let Err(e) = stream.shutdown().await {
        debug!("session {}: error closing connection: {}", id, e);
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsSnapshot;
    use tokio_test::io::Builder;

    fn peer() -> SocketAddr {
        "127.0.0.1:9999".parse().unwrap()
    }

    fn context(idle_timeout: Option<Duration>) -> SessionContext {
        SessionContext {
            vocabulary: Arc::new(Vocabulary::from_words([
                "crane", "trace", "stone", "llama",
            ])),
            stats: Arc::new(StatisticsRegistry::new()),
            ledger: Arc::new(HiddenWordLedger::new()),
            idle_timeout,
        }
    }

    fn crane() -> GameSession {
        GameSession::new("crane").unwrap()
    }

    #[tokio::test]
    async fn test_win_on_first_guess() {
        let ctx = context(None);
        let stream = Builder::new()
            .read(b"crane")
            .write(&Packet::scored(5, *b"CRANE").encode().unwrap())
            .build();

        let end = run_session(1, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Won);
        assert_eq!(
            ctx.stats.snapshot().await,
            StatsSnapshot {
                total_guesses: 1,
                total_wins: 1,
                total_losses: 0,
            }
        );
        assert_eq!(ctx.ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_partial_result_then_win() {
        let ctx = context(None);
        let stream = Builder::new()
            .read(b"TRACE")
            .write(&Packet::scored(5, *b"-RAcE").encode().unwrap())
            .read(b"crane")
            .write(&Packet::scored(4, *b"CRANE").encode().unwrap())
            .build();

        let end = run_session(2, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Won);
        let stats = ctx.stats.snapshot().await;
        assert_eq!(stats.total_guesses, 2);
        assert_eq!(stats.total_wins, 1);
    }

    #[tokio::test]
    async fn test_invalid_guesses_then_disconnect() {
        let ctx = context(None);
        let stream = Builder::new()
            .read(b"hello")
            .write(&Packet::invalid(6).encode().unwrap())
            .read(b"cranes")
            .write(&Packet::invalid(6).encode().unwrap())
            .build();

        let end = run_session(3, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Abandoned(AbandonReason::Disconnected));
        assert_eq!(
            ctx.stats.snapshot().await,
            StatsSnapshot {
                total_guesses: 0,
                total_wins: 0,
                total_losses: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_six_misses_lose() {
        let ctx = context(None);
        let mut builder = Builder::new();
        for remaining in (1..6).rev() {
            builder
                .read(b"stone")
                .write(&Packet::scored(remaining, *b"---NE").encode().unwrap());
        }
        builder
            .read(b"stone")
            .write(&Packet::scored(0, *b"CRANE").encode().unwrap());

        let end = run_session(
            4,
            peer(),
            builder.build(),
            crane(),
            ctx.clone(),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(end, SessionEnd::Lost);
        assert_eq!(
            ctx.stats.snapshot().await,
            StatsSnapshot {
                total_guesses: 6,
                total_wins: 0,
                total_losses: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_receive_error_counts_as_loss() {
        let ctx = context(None);
        let stream = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();

        let end = run_session(5, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Abandoned(AbandonReason::ReceiveFailed));
        assert_eq!(ctx.stats.snapshot().await.total_losses, 1);
    }

    #[tokio::test]
    async fn test_send_failure_ends_session() {
        let ctx = context(None);
        let stream = Builder::new()
            .read(b"trace")
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();

        let end = run_session(6, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Abandoned(AbandonReason::SendFailed));
        let stats = ctx.stats.snapshot().await;
        assert_eq!(stats.total_guesses, 1);
        assert_eq!(stats.total_losses, 1);
    }

    #[tokio::test]
    async fn test_send_failure_after_win_keeps_the_win() {
        let ctx = context(None);
        let stream = Builder::new()
            .read(b"crane")
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();

        let end = run_session(7, peer(), stream, crane(), ctx.clone(), CancellationToken::new()).await;

        assert_eq!(end, SessionEnd::Won);
        let stats = ctx.stats.snapshot().await;
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.total_losses, 0);
    }

    #[tokio::test]
    async fn test_cancellation_while_waiting_for_guess() {
        let ctx = context(None);
        let (server_side, _client_side) = tokio::io::duplex(64);
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run_session(
            8,
            peer(),
            server_side,
            crane(),
            ctx.clone(),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let end = worker.await.unwrap();
        assert_eq!(end, SessionEnd::Abandoned(AbandonReason::Shutdown));
        assert_eq!(ctx.stats.snapshot().await, StatsSnapshot::default());
        assert_eq!(ctx.ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_idle_timeout_abandons_session() {
        let ctx = context(Some(Duration::from_millis(50)));
        let (server_side, _client_side) = tokio::io::duplex(64);

        let end = run_session(
            9,
            peer(),
            server_side,
            crane(),
            ctx.clone(),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(end, SessionEnd::Abandoned(AbandonReason::IdleTimeout));
        assert_eq!(ctx.stats.snapshot().await.total_losses, 1);
    }
}
