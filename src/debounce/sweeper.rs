// Background task that evicts expired entries from the debounce store.

use super::store::DebounceStore;
use std::sync::Arc;
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Duration, Instant, MissedTickBehavior, interval},
};
use tracing::debug;

const MIN_PERIOD: Duration = Duration::from_secs(1);
const MAX_PERIOD: Duration = Duration::from_secs(60 * 60);

pub struct StoreSweeper {
    // Sender to signal the background task to stop.
    stop_tx: Option<oneshot::Sender<()>>,

    handle: Option<JoinHandle<()>>,
}

impl StoreSweeper {
    /// Spawn a task that purges `store` every `every`, clamped to one second..one hour.
    pub fn spawn(store: Arc<DebounceStore>, every: Duration) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let period = every.clamp(MIN_PERIOD, MAX_PERIOD);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; nothing can be expired yet.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let purged = store.purge_expired(Instant::now());
                        if purged > 0 {
                            debug!("Purged {} expired join-request entries ({} left)", purged, store.len());
                        }
                    }

                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    // Gracefully stop the background task and await its completion.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }

        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

impl Drop for StoreSweeper {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }

        if let Some(h) = &self.handle {
            h.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::UserId;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn evicts_entries_after_window() {
        let window = Duration::from_secs(30);
        let store = Arc::new(DebounceStore::new(window));
        let now = Instant::now();
        store.try_reserve(UserId(1), now).unwrap().commit(now);

        let mut sweeper = StoreSweeper::spawn(Arc::clone(&store), window);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);

        sleep(Duration::from_secs(25)).await;
        assert!(store.is_empty());

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn huge_period_is_clamped() {
        let window = Duration::from_secs(1);
        let store = Arc::new(DebounceStore::new(window));
        let now = Instant::now();
        store.try_reserve(UserId(2), now).unwrap().commit(now);

        let mut sweeper = StoreSweeper::spawn(Arc::clone(&store), Duration::MAX);

        sleep(MAX_PERIOD - Duration::from_secs(1)).await;
        assert_eq!(store.len(), 1);

        sleep(Duration::from_secs(2)).await;
        assert!(store.is_empty());

        sweeper.shutdown().await;
    }
}
