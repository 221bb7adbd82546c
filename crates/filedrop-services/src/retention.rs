//! Retention sweeper
//!
//! Periodically deletes stored files older than the retention window. Each
//! run is independent and stateless; one failing entry never aborts the rest
//! of the batch. The sweeper is only ever constructed when retention is
//! enabled.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filedrop_storage::Storage;
use tokio::time::interval;

/// Outcome of one sweep over the namespace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub deleted: usize,
    pub kept: usize,
    pub failed: usize,
}

/// A file is expired once its age strictly exceeds the window; a file exactly
/// at the window age is kept.
pub fn is_expired(age: Duration, window: Duration) -> bool {
    age > window
}

pub struct RetentionSweeper {
    storage: Arc<dyn Storage>,
    window: Duration,
}

impl RetentionSweeper {
    pub fn new(storage: Arc<dyn Storage>, window: Duration) -> Self {
        Self { storage, window }
    }

    /// Start the background task sweeping once per `period`.
    /// Returns a JoinHandle the process aborts on shutdown.
    pub fn start(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick of a tokio interval completes immediately;
            // consume it so the first sweep happens one period from startup.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let stats = self.sweep(SystemTime::now()).await;
                tracing::info!(
                    deleted = stats.deleted,
                    kept = stats.kept,
                    failed = stats.failed,
                    "Retention sweep completed"
                );
            }
        })
    }

    /// Sweep the namespace once, deleting every entry whose age exceeds the
    /// window at `now`.
    pub async fn sweep(&self, now: SystemTime) -> SweepStats {
        let entries = match self.storage.list().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "Failed to enumerate storage for retention sweep");
                return SweepStats::default();
            }
        };

        let mut stats = SweepStats::default();

        for entry in entries {
            // A modification time in the future means the upload is newer
            // than our clock reading; it is certainly not expired.
            let age = match now.duration_since(entry.modified) {
                Ok(age) => age,
                Err(_) => {
                    stats.kept += 1;
                    continue;
                }
            };

            if !is_expired(age, self.window) {
                stats.kept += 1;
                continue;
            }

            match self.storage.delete(&entry.name).await {
                Ok(()) => {
                    tracing::info!(
                        name = %entry.name,
                        age_secs = age.as_secs(),
                        "Deleted expired file"
                    );
                    stats.deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        name = %entry.name,
                        error = %e,
                        "Failed to delete expired file, skipping"
                    );
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}
