//! Trailing-edge debounced persistence.
//!
//! Every edit calls [`Autosaver::schedule`] with the latest snapshot. Only the
//! last snapshot of a burst of edits reaches storage, `delay` after the burst
//! ends.
//!
//! Only the wait is cancellable. A write that has started always runs to
//! completion, and `cancel` / `flush` return only after it has.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::storage::{Storage, StorageError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

pub struct Autosaver {
    storage: Arc<dyn Storage>,
    key: String,
    delay: Duration,
    /// Bumped by every schedule, flush and cancel. A scheduled write only
    /// proceeds if its epoch is still current.
    epoch: Arc<AtomicU64>,
    /// Held across the epoch check and the storage write.
    write_lock: Arc<Mutex<()>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    last_written_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl Autosaver {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>, delay: Duration) -> Self {
        Self {
            storage,
            key: key.into(),
            delay,
            epoch: Arc::new(AtomicU64::new(0)),
            write_lock: Arc::new(Mutex::new(())),
            pending: Mutex::new(None),
            last_written_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Schedules `payload` to be written after the quiet period, superseding
    /// any write still waiting.
    pub async fn schedule(&self, payload: String) {
        let mut pending = self.pending.lock().await;
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();
        let delay = self.delay;
        let current = Arc::clone(&self.epoch);
        let write_lock = Arc::clone(&self.write_lock);
        let last_written_at = Arc::clone(&self.last_written_at);

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let _write = write_lock.lock().await;
            if current.load(Ordering::SeqCst) != epoch {
                debug!("Auto-save superseded");
                return;
            }
            match storage.set(&key, &payload).await {
                Ok(()) => {
                    *last_written_at.lock().await = Some(Utc::now());
                    info!("Draft auto-saved ({} bytes)", payload.len());
                }
                Err(e) => warn!("Auto-save failed: {e}"),
            }
        }));
        debug!("Auto-save scheduled in {}ms", delay.as_millis());
    }

    /// Writes `payload` now, superseding any pending write.
    pub async fn flush(&self, payload: &str) -> Result<(), StorageError> {
        let _write = self.write_lock.lock().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().await.take();

        self.storage.set(&self.key, payload).await?;
        *self.last_written_at.lock().await = Some(Utc::now());
        info!("Draft saved ({} bytes)", payload.len());
        Ok(())
    }

    /// Drops the pending write, if any. Waits for a write already in progress.
    pub async fn cancel(&self) {
        let _write = self.write_lock.lock().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if self.pending.lock().await.take().is_some() {
            debug!("Pending auto-save cancelled");
        }
    }

    pub async fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn last_written_at(&self) -> Option<DateTime<Utc>> {
        *self.last_written_at.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::storage::MemoryStorage;

    /// Counts writes on top of a memory store.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    fn saver(storage: &Arc<CountingStorage>) -> Autosaver {
        let storage: Arc<dyn Storage> = storage.clone();
        Autosaver::new(storage, "resumeData", DEFAULT_DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_writes_once_with_last_snapshot() {
        let storage = Arc::new(CountingStorage::default());
        let autosaver = saver(&storage);

        autosaver.schedule("one".to_string()).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        autosaver.schedule("two".to_string()).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        autosaver.schedule("three".to_string()).await;
        tokio::time::sleep(Duration::from_millis(700)).await;

        // 700ms after the last edit: still waiting.
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
        assert!(autosaver.is_pending().await);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            storage.get("resumeData").await.unwrap().as_deref(),
            Some("three")
        );
        assert!(autosaver.last_written_at().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately_and_cancels_pending() {
        let storage = Arc::new(CountingStorage::default());
        let autosaver = saver(&storage);

        autosaver.schedule("stale".to_string()).await;
        autosaver.flush("fresh").await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            storage.get("resumeData").await.unwrap().as_deref(),
            Some("fresh")
        );
    }

    /// Memory store whose writes take a while to land.
    #[derive(Default)]
    struct SlowStorage {
        inner: MemoryStorage,
    }

    #[async_trait]
    impl Storage for SlowStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_waits_for_write_in_progress() {
        let storage = Arc::new(SlowStorage::default());
        let autosaver = Autosaver::new(storage.clone(), "resumeData", DEFAULT_DEBOUNCE);

        autosaver.schedule("late".to_string()).await;
        // Past the quiet period, inside the slow write.
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(50)).await;

        autosaver.cancel().await;
        assert_eq!(
            storage.get("resumeData").await.unwrap().as_deref(),
            Some("late")
        );

        // A removal issued after cancel is never overtaken by the write.
        storage.remove("resumeData").await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.get("resumeData").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_write() {
        let storage = Arc::new(CountingStorage::default());
        let autosaver = saver(&storage);

        autosaver.schedule("never".to_string()).await;
        autosaver.cancel().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
        assert!(!autosaver.is_pending().await);
    }
}
