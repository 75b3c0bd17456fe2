use crate::model::ScanEntry;
use crate::store::DurableStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

type PendingSlot = Arc<Mutex<Option<Vec<ScanEntry>>>>;

/// Coalesces log snapshots into at most one store write per delay window.
///
/// Every `stage` replaces the pending snapshot and restarts the timer, so only
/// the snapshot staged last before the timer fires is written. Write failures
/// are logged and dropped; the next staged snapshot carries the full log.
///
/// `stage` spawns onto the current tokio runtime.
pub struct BufferedWriter {
    store: DurableStore,
    delay: Duration,
    pending: PendingSlot,
    timer: Option<JoinHandle<()>>,
}

impl BufferedWriter {
    pub fn new(store: DurableStore, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: Arc::new(Mutex::new(None)),
            timer: None,
        }
    }

    pub fn stage(&mut self, snapshot: Vec<ScanEntry>) {
        trace!("Staging snapshot of {} rows", snapshot.len());
        *lock(&self.pending) = Some(snapshot);

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let pending = Arc::clone(&self.pending);
        let store = self.store.clone();
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            write_pending(&store, &pending);
        }));
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// Cancel the timer and write whatever is pending right away.
    /// Returns true when a snapshot was written.
    pub fn flush_now(&mut self) -> bool {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        write_pending(&self.store, &self.pending)
    }
}

// The slot stays locked through the save so that writes land in staging order.
fn write_pending(store: &DurableStore, pending: &PendingSlot) -> bool {
    let mut slot = lock(pending);
    let Some(rows) = slot.take() else {
        trace!("Flush with nothing pending");
        return false;
    };
    match store.save_rows(&rows) {
        Ok(()) => {
            debug!("Flushed {} rows", rows.len());
            true
        }
        Err(e) => {
            warn!("Failed to persist {} rows, keeping them in memory: {}", rows.len(), e);
            false
        }
    }
}

fn lock(pending: &PendingSlot) -> MutexGuard<'_, Option<Vec<ScanEntry>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
