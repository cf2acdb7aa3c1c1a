use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use nook_vault::Vault;

use crate::channel::Channel;
use crate::error::StoreError;
use crate::registry::ChannelRegistry;

/// Single-slot "there is unsaved work" notification.
///
/// `raise` never blocks: if a flush is already pending, the new signal
/// is dropped, so any burst of mutations between two flushes collapses
/// to at most one additional snapshot write.
#[derive(Clone)]
pub struct FlushSignal {
    tx: mpsc::Sender<()>,
}

impl FlushSignal {
    pub fn new() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    pub fn raise(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Where registry snapshots go when the persistence loop services a
/// flush. Production writes through the vault; tests count calls.
pub trait SnapshotSink: Send + Sync {
    fn persist(&self, snapshot: &HashMap<String, Channel>) -> Result<(), StoreError>;
}

/// Sink backed by an encrypted vault snapshot file.
pub struct VaultSink {
    vault: Vault,
    file: String,
}

impl VaultSink {
    pub fn new(vault: Vault, file: impl Into<String>) -> Self {
        Self {
            vault,
            file: file.into(),
        }
    }

    /// Load the persisted registry state, if any. A missing snapshot
    /// reads as "start empty"; a corrupt one propagates as an error.
    pub fn load(&self) -> Result<Option<HashMap<String, Channel>>, StoreError> {
        Ok(self.vault.load(&self.file)?)
    }
}

impl SnapshotSink for VaultSink {
    fn persist(&self, snapshot: &HashMap<String, Channel>) -> Result<(), StoreError> {
        self.vault.save(snapshot, &self.file)?;
        Ok(())
    }
}

/// Long-lived debounced persistence loop.
///
/// Waits for the flush signal, takes a consistent snapshot under a
/// brief read lock, and persists it with no lock held. Persist
/// failures are logged and the loop keeps serving later signals.
/// Cancellation stops the loop without draining; a pending signal
/// that has not been serviced at shutdown is dropped.
pub async fn run_flush_loop(
    registry: Arc<ChannelRegistry>,
    sink: Arc<dyn SnapshotSink>,
    mut rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    info!("persistence loop started");
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            signal = rx.recv() => {
                if signal.is_none() {
                    break;
                }
                let snapshot = registry.snapshot();
                match sink.persist(&snapshot) {
                    Ok(()) => debug!(channels = snapshot.len(), "registry flushed"),
                    Err(e) => error!(error = %e, "registry flush failed"),
                }
            }
        }
    }
    info!("persistence loop stopped");
}
