//! Aggregate game counters shared by every session.

use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Counters {
    guesses: u64,
    wins: u64,
    losses: u64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_guesses: u64,
    pub total_wins: u64,
    pub total_losses: u64,
}

/// Guesses, wins and losses for the lifetime of the process.
///
/// Counters only ever increase. Each update takes the lock for a single
/// increment; callers never see the raw counters.
#[derive(Debug, Default)]
pub struct StatisticsRegistry {
    counters: Mutex<Counters>,
}

impl StatisticsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_guess(&self) {
        self.counters.lock().await.guesses += 1;
    }

    pub async fn record_win(&self) {
        self.counters.lock().await.wins += 1;
    }

    pub async fn record_loss(&self) {
        self.counters.lock().await.losses += 1;
    }

    pub async fn snapshot(&self) -> StatsSnapshot {
        let counters = self.counters.lock().await;
        StatsSnapshot {
            total_guesses: counters.guesses,
            total_wins: counters.wins,
            total_losses: counters.losses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_starts_at_zero() {
        let stats = StatisticsRegistry::new();
        assert_eq!(stats.snapshot().await, StatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_records_each_counter_independently() {
        let stats = StatisticsRegistry::new();
        stats.record_guess().await;
        stats.record_guess().await;
        stats.record_win().await;
        stats.record_loss().await;

        let snapshot = stats.snapshot().await;
        assert_eq!(snapshot.total_guesses, 2);
        assert_eq!(snapshot.total_wins, 1);
        assert_eq!(snapshot.total_losses, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let stats = Arc::new(StatisticsRegistry::new());

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let stats = Arc::clone(&stats);
                tokio::spawn(async move {
                    for _ in 0..100 {
                        stats.record_guess().await;
                    }
                    stats.record_loss().await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = stats.snapshot().await;
        assert_eq!(snapshot.total_guesses, 6400);
        assert_eq!(snapshot.total_losses, 64);
        assert_eq!(snapshot.total_wins, 0);
    }
}
