//! # Storage Edit Buffer
//!
//! Per-account pending edits. Buffers are fully isolated: nothing done to
//! one account's edits is visible in another's.

use super::errors::InspectorResult;
use super::hex::{Address, HexBlob};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Pending key to value pairs of one account, ordered by key.
pub type PendingEdits = BTreeMap<HexBlob, HexBlob>;

/// Uncommitted edits for every account.
#[derive(Debug, Default, Clone)]
pub struct StorageEditBuffer {
    edits: HashMap<Address, PendingEdits>,
}

impl StorageEditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a pair. Last write wins for a repeated key.
    ///
    /// Both sides are validated before anything is stored.
    pub fn stage(&mut self, account: &Address, key: &str, value: &str) -> InspectorResult<()> {
        let key = HexBlob::parse("key", key)?;
        let value = HexBlob::parse("value", value)?;
        debug!(address = %account, key = %key, value = %value, "Edit staged");
        self.edits
            .entry(account.clone())
            .or_default()
            .insert(key, value);
        Ok(())
    }

    /// Remove one pending pair. Returns whether anything was removed.
    pub fn unstage(&mut self, account: &Address, key: &str) -> bool {
        let Some(pending) = self.edits.get_mut(account) else {
            return false;
        };
        let removed = pending.remove(key.trim()).is_some();
        if pending.is_empty() {
            self.edits.remove(account);
        }
        if removed {
            debug!(address = %account, key = key.trim(), "Edit unstaged");
        }
        removed
    }

    /// Read-only snapshot of one account's pending pairs.
    pub fn pending(&self, account: &Address) -> PendingEdits {
        self.edits.get(account).cloned().unwrap_or_default()
    }

    /// Number of pending pairs for an account.
    pub fn pending_count(&self, account: &Address) -> usize {
        self.edits.get(account).map_or(0, BTreeMap::len)
    }

    pub fn has_pending(&self, account: &Address) -> bool {
        self.pending_count(account) > 0
    }

    /// Snapshot taken right before a commit is sent.
    ///
    /// The buffer is not cleared here; call [`confirm_committed`] once the
    /// backend has accepted the snapshot.
    ///
    /// [`confirm_committed`]: Self::confirm_committed
    pub fn commit_snapshot(&self, account: &Address) -> PendingEdits {
        self.pending(account)
    }

    /// Drop the pairs a successful commit carried.
    ///
    /// A key restaged with a different value while the commit was in
    /// flight stays pending.
    pub fn confirm_committed(&mut self, account: &Address, committed: &PendingEdits) {
        let Some(pending) = self.edits.get_mut(account) else {
            return;
        };
        pending.retain(|key, value| committed.get(key) != Some(value));
        if pending.is_empty() {
            self.edits.remove(account);
        }
    }
}
