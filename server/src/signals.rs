//! Process signal handling.
//!
//! On Unix, SIGUSR1 requests a graceful shutdown. SIGINT, SIGTERM and
//! SIGUSR2 are caught and ignored; once a handler is installed the default
//! terminate action no longer applies, so handlers must be installed
//! before the server starts accepting.

use log::info;
use std::io;

#[cfg(unix)]
pub struct ShutdownSignal {
    shutdown: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    user2: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            shutdown: signal(SignalKind::user_defined1())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            user2: signal(SignalKind::user_defined2())?,
        })
    }

    /// Resolves on SIGUSR1. Ignored signals are logged and waited past.
    pub async fn wait(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    info!("received SIGUSR1; shutting down");
                    return;
                }
                _ = self.interrupt.recv() => info!("ignoring SIGINT"),
                _ = self.terminate.recv() => info!("ignoring SIGTERM"),
                _ = self.user2.recv() => info!("ignoring SIGUSR2"),
            }
        }
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    pub fn install() -> io::Result<Self> {
        Ok(Self)
    }

    /// Resolves on Ctrl-C.
    pub async fn wait(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl-C; shutting down"),
            Err(e) => log::error!("failed to listen for Ctrl-C: {}", e),
        }
    }
}
