//! Tracking of live session workers for capacity limits and shutdown
//!
//! The registry owns the join handle and cancellation token of every
//! worker it spawned. It is used for two things only:
//! - Enforcing the concurrent-session cap when a connection arrives
//! - Cancelling and joining every worker at shutdown
//!
//! Workers never lock the registry. Finished workers are reaped lazily by
//! the next registration or count, so holding the lock while joining
//! workers in [`SessionRegistry::drain`] cannot deadlock.

use crate::error::CapacityExceeded;
use crate::session::SessionEnd;
use log::{debug, error, info};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type SessionId = u64;

/// A spawned worker and the means to stop it.
#[derive(Debug)]
pub struct SessionHandle {
    pub peer: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<SessionEnd>,
}

impl SessionHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Debug)]
struct Sessions {
    live: HashMap<SessionId, SessionHandle>,
    next_id: SessionId,
}

impl Sessions {
    fn reap_finished(&mut self) {
        self.live.retain(|id, handle| {
            let finished = handle.is_finished();
            if finished {
                debug!("session {} from {} reaped", id, handle.peer);
            }
            !finished
        });
    }
}

/// Set of live session workers, bounded by `max_sessions`.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
}

impl SessionRegistry {
    /// Session ids start from 1 and are never reused.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions {
                live: HashMap::new(),
                next_id: 1,
            }),
            max_sessions,
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Spawns a worker for `peer` if there is room for one.
    ///
    /// `start` receives the new session id and the token the worker must
    /// watch for cancellation, and returns the worker future. Returns
    /// [`CapacityExceeded`] without calling `start` when the registry is
    /// full; the caller is expected to close the connection.
    pub async fn register<F, Fut>(
        &self,
        peer: SocketAddr,
        start: F,
    ) -> Result<SessionId, CapacityExceeded>
    where
        F: FnOnce(SessionId, CancellationToken) -> Fut,
        Fut: Future<Output = SessionEnd> + Send + 'static,
    {
        let mut sessions = self.sessions.lock().await;
        sessions.reap_finished();

        if sessions.live.len() >= self.max_sessions {
            return Err(CapacityExceeded {
                max_sessions: self.max_sessions,
            });
        }

        let id = sessions.next_id;
        sessions.next_id += 1;

        let cancel = CancellationToken::new();
        let task = tokio::spawn(start(id, cancel.clone()));
        sessions
            .live
            .insert(id, SessionHandle { peer, cancel, task });

        info!("session {} started for {}", id, peer);
        Ok(id)
    }

    /// Number of workers that have not yet finished.
    pub async fn live_count(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        sessions.reap_finished();
        sessions.live.len()
    }

    /// Cancels every registered worker and waits for each to return.
    ///
    /// The lock is held for the whole drain. Returns how many workers
    /// were joined, including ones that had already finished.
    pub async fn drain(&self) -> usize {
        let mut sessions = self.sessions.lock().await;

        for handle in sessions.live.values() {
            handle.cancel.cancel();
        }

        let mut joined = 0;
        for (id, handle) in sessions.live.drain() {
            match handle.task.await {
                Ok(end) => debug!("session {} joined: {:?}", id, end),
                Err(e) => error!("session {} worker failed: {}", id, e),
            }
            joined += 1;
        }

        joined
    }
}
