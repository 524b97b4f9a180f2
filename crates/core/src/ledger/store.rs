//! Storage port for the ledger document.

use async_trait::async_trait;
use thiserror::Error;

use super::state::LedgerState;

/// Errors produced by a [`LedgerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation.
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),

    /// The stored document exists but could not be decoded.
    #[error("ledger document corrupt: {0}")]
    Corrupt(String),
}

/// Port to the document store holding the single ledger document.
///
/// Implementations load and save the whole ledger at once; there is no
/// partial-update surface.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads the ledger document, `None` when it has never been written.
    async fn load(&self) -> Result<Option<LedgerState>, StoreError>;

    /// Writes the full ledger document, creating it when absent.
    async fn save(&self, state: &LedgerState) -> Result<(), StoreError>;
}

/// In-process store keeping the document in a mutex-guarded slot.
///
/// The database-backed implementation lives in the storage crate; this
/// one backs unit tests across the workspace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: tokio::sync::Mutex<Option<LedgerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently saved state, if any.
    pub async fn saved(&self) -> Option<LedgerState> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        *self.slot.lock().await = Some(state.clone());
        Ok(())
    }
}
