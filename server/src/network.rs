//! Server network layer: the connection acceptor and shutdown coordinator

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::game::GameSession;
use crate::ledger::HiddenWordLedger;
use crate::registry::SessionRegistry;
use crate::session::{run_session, SessionContext};
use crate::stats::{StatisticsRegistry, StatsSnapshot};
use crate::vocabulary::Vocabulary;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State shared between the acceptor, the workers and the coordinator.
#[derive(Debug)]
struct Shared {
    stats: Arc<StatisticsRegistry>,
    ledger: Arc<HiddenWordLedger>,
    sessions: SessionRegistry,
    stopped: AtomicBool,
}

/// What was left when the server finished draining.
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    pub stats: StatsSnapshot,
    /// Every hidden word used this run, uppercased, in session start order.
    pub hidden_words: Vec<String>,
    pub sessions_drained: usize,
}

/// A bound, not yet accepting, game server.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    vocabulary: Arc<Vocabulary>,
}

impl Server {
    pub async fn bind(config: ServerConfig, vocabulary: Vocabulary) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!("Wordle server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            config,
            vocabulary: Arc::new(vocabulary),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Spawns the accept loop and returns a handle for stopping it.
    pub fn start(self) -> io::Result<ServerHandle> {
        let local_addr = self.listener.local_addr()?;
        let shared = Arc::new(Shared {
            stats: Arc::new(StatisticsRegistry::new()),
            ledger: Arc::new(HiddenWordLedger::new()),
            sessions: SessionRegistry::new(self.config.max_sessions),
            stopped: AtomicBool::new(false),
        });

        let ctx = SessionContext {
            vocabulary: Arc::clone(&self.vocabulary),
            stats: Arc::clone(&shared.stats),
            ledger: Arc::clone(&shared.ledger),
            idle_timeout: self.config.idle_timeout,
        };

        let rng = StdRng::seed_from_u64(self.config.seed);
        info!(
            "seeded pseudo-random number generator with {}",
            self.config.seed
        );

        let shutdown = CancellationToken::new();
        let acceptor = tokio::spawn(accept_loop(
            self.listener,
            Arc::clone(&shared),
            ctx,
            rng,
            shutdown.clone(),
        ));

        Ok(ServerHandle {
            shared,
            shutdown,
            acceptor,
            vocabulary: self.vocabulary,
            local_addr,
        })
    }

    /// Serves until `signal` resolves, then shuts down.
    pub async fn run_until<F>(self, signal: F) -> Result<ShutdownReport, ServerError>
    where
        F: Future<Output = ()>,
    {
        let handle = self.start()?;
        signal.await;
        Ok(handle.shutdown().await)
    }
}

/// Accepts connections until `shutdown` fires, one worker per connection.
///
/// Hidden words are drawn here, in accept order, so a given seed and
/// connection order always yield the same words.
async fn accept_loop(
    listener: TcpListener,
    shared: Arc<Shared>,
    ctx: SessionContext,
    mut rng: StdRng,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(connection) => connection,
                Err(e) => {
                    warn!("accept() failed: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            },
        };

        info!("rcvd incoming connection request from {}", peer);

        let Some(game) = ctx.vocabulary.choose(&mut rng).and_then(GameSession::new) else {
            error!("no hidden word available; dropping {}", peer);
            continue;
        };

        let session_ctx = ctx.clone();
        let registered = shared
            .sessions
            .register(peer, move |id, cancel| {
                run_session(id, peer, stream, game, session_ctx, cancel)
            })
            .await;

        if let Err(e) = registered {
            warn!("refusing connection from {}: {}", peer, e);
        }
    }

    drop(listener);
    info!("listener closed; no longer accepting connections");
}

/// Handle to a running server.
pub struct ServerHandle {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    acceptor: JoinHandle<()>,
    vocabulary: Arc<Vocabulary>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    pub async fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot().await
    }

    pub async fn live_sessions(&self) -> usize {
        self.shared.sessions.live_count().await
    }

    /// Number of hidden words recorded so far, one per session started.
    pub async fn ledger_len(&self) -> usize {
        self.shared.ledger.len().await
    }

    /// Stops accepting, drains every session, and finalizes the ledger.
    ///
    /// Steps run strictly in order: mark stopped, close the listener,
    /// cancel and join all workers, uppercase and release the ledger,
    /// release the vocabulary.
    pub async fn shutdown(self) -> ShutdownReport {
        info!("shutting down");
        self.shared.stopped.store(true, Ordering::SeqCst);

        self.shutdown.cancel();
        if let Err(e) = self.acceptor.await {
            error!("acceptor task failed: {}", e);
        }

        let sessions_drained = self.shared.sessions.drain().await;
        info!("joined {} session(s)", sessions_drained);

        let hidden_words = self.shared.ledger.finalize().await;
        for word in &hidden_words {
            info!("hidden word: {}", word);
        }

        drop(self.vocabulary);

        let stats = self.shared.stats.snapshot().await;
        info!(
            "{} guesses, {} wins, {} losses",
            stats.total_guesses, stats.total_wins, stats.total_losses
        );

        ShutdownReport {
            stats,
            hidden_words,
            sessions_drained,
        }
    }
}
