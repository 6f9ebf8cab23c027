//! Background store reconciliation
//!
//! Other moodlog processes sharing the same data directory rewrite the whole
//! store file on every mutation. A periodic poll re-reads the file and, when
//! the on-disk snapshot differs from memory, replaces the in-memory
//! collection wholesale.
//!
//! This is last-writer-wins at collection granularity, with no per-entry
//! merge: if two processes edit different entries between ticks, one side's
//! edit is silently lost. Acceptable for a personal journal; do not extend
//! this to shared multi-writer deployments.

use crate::store::engine::EntryStore;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Start the background reconciliation task
///
/// Polls the store file at the configured interval and adopts external
/// changes. Runs until [`EntryStore::shutdown`] is signalled, performing one
/// final reconciliation pass on the way out.
pub fn start_background_sync(store: &Arc<EntryStore>) -> tokio::task::JoinHandle<()> {
    let store = Arc::clone(store);
    let poll_interval = Duration::from_secs(store.config().sync_interval_secs.max(1));
    let shutdown = store.shutdown_flag();

    tokio::spawn(async move {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            if *shutdown.read().await {
                break;
            }

            match store.reconcile().await {
                Ok(true) => tracing::debug!("Adopted external store snapshot"),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "Store reconciliation failed"),
            }
        }

        if let Err(e) = store.reconcile().await {
            tracing::warn!(error = %e, "Final reconciliation failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::engine::StoreConfig;
    use crate::store::types::{MoodEntry, MoodRating};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sync_task_picks_up_external_write() {
        let dir = tempdir().unwrap();
        let mut config = StoreConfig::new(dir.path());
        config.sync_interval_secs = 1;

        let store = Arc::new(EntryStore::open(config.clone()).await.unwrap());
        let handle = start_background_sync(&store);

        let external = vec![MoodEntry::new(MoodRating::new(5).unwrap()).note("external")];
        std::fs::write(
            config.entries_path(),
            serde_json::to_string(&external).unwrap(),
        )
        .unwrap();

        // Give the poll a couple of ticks
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.snapshot().await[0].note, "external");

        store.shutdown().await;
        let _ = handle.await;
    }
}
