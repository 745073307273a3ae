//! Audit record of every hidden word chosen during this run.

use tokio::sync::Mutex;

/// Append-only list of hidden words, one entry per session started.
///
/// Entries stay lowercase while the server runs and are revealed in
/// uppercase only by [`HiddenWordLedger::finalize`] at shutdown.
#[derive(Debug, Default)]
pub struct HiddenWordLedger {
    entries: Mutex<Vec<String>>,
}

impl HiddenWordLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, word: &str) {
        self.entries.lock().await.push(word.to_owned());
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Uppercases every entry and hands them back, releasing the storage.
    ///
    /// Must only run once all sessions have been joined. A second call
    /// returns an empty list.
    pub async fn finalize(&self) -> Vec<String> {
        let mut entries = self.entries.lock().await;
        for entry in entries.iter_mut() {
            entry.make_ascii_uppercase();
        }
        std::mem::take(&mut *entries)
    }
}
