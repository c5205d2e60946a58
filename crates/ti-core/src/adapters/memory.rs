//! In-memory trie backend.
//!
//! Keeps per-account storage, builds a nibble trie over 32-byte slot keys
//! on every commit, and can inject failures and latency. Root hashes are
//! synthetic commit counters, not digests.

use crate::domain::edits::PendingEdits;
use crate::domain::hex::{strip_hex_prefix, Address, HexBlob};
use crate::ports::{BackendGateway, GatewayError};
use parking_lot::Mutex;
use shared_types::{OriginalKvPair, ProofReading, RawTrieNode, TrieEnvelope, TriePayload, ValueReading};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

/// Hex digits in a storage slot key or value.
const SLOT_HEX_DIGITS: usize = 64;

/// Backend operation, as recorded by [`InMemoryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAccount,
    SelectAccount,
    UpdateStorage,
    CommitTrie,
    ReadValue,
    ReadProof,
}

/// One request received by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub address: Address,
}

#[derive(Debug, Default)]
struct AccountStorage {
    /// Written by `update_storage`, not yet committed.
    staged: BTreeMap<String, String>,
    committed: BTreeMap<String, String>,
    commits: u64,
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: HashMap<Address, AccountStorage>,
    overrides: HashMap<Address, TrieEnvelope>,
    failures: VecDeque<GatewayError>,
    latency: Duration,
    calls: Vec<RecordedCall>,
}

/// In-memory implementation of BackendGateway for testing
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: GatewayError) {
        self.state.lock().failures.push_back(err);
    }

    /// Delay every subsequent reply.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// Reply with `envelope` instead of the generated trie for this account.
    pub fn override_trie(&self, address: &Address, envelope: TrieEnvelope) {
        self.state.lock().overrides.insert(address.clone(), envelope);
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn calls_for(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Committed storage of an account as bare 64-digit hex.
    pub fn committed(&self, address: &Address) -> BTreeMap<String, String> {
        self.state
            .lock()
            .accounts
            .get(address)
            .map(|a| a.committed.clone())
            .unwrap_or_default()
    }

    async fn enter(&self, operation: Operation, address: &Address) -> Result<(), GatewayError> {
        let (latency, failure) = {
            let mut state = self.state.lock();
            state.calls.push(RecordedCall {
                operation,
                address: address.clone(),
            });
            (state.latency, state.failures.pop_front())
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        failure.map_or(Ok(()), Err)
    }

    fn envelope(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        let state = self.state.lock();
        if let Some(envelope) = state.overrides.get(address) {
            return Ok(envelope.clone());
        }
        let account = state
            .accounts
            .get(address)
            .ok_or_else(|| GatewayError::Backend("Account not found".to_string()))?;
        Ok(TrieEnvelope {
            status: Some("success".to_string()),
            address: Some(address.to_string()),
            trie: Some(trie_payload(account)),
        })
    }
}

#[async_trait::async_trait]
impl BackendGateway for InMemoryBackend {
    async fn create_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.enter(Operation::CreateAccount, address).await?;
        self.state
            .lock()
            .accounts
            .entry(address.clone())
            .or_default();
        self.envelope(address)
    }

    async fn select_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.enter(Operation::SelectAccount, address).await?;
        self.envelope(address)
    }

    async fn update_storage(
        &self,
        address: &Address,
        storage: &PendingEdits,
    ) -> Result<TrieEnvelope, GatewayError> {
        self.enter(Operation::UpdateStorage, address).await?;
        let mut writes = Vec::with_capacity(storage.len());
        for (key, value) in storage {
            writes.push((slot_hex("key", key)?, slot_hex("value", value)?));
        }
        {
            let mut state = self.state.lock();
            let account = state.accounts.entry(address.clone()).or_default();
            account.staged.extend(writes);
        }
        self.envelope(address)
    }

    async fn commit_trie(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.enter(Operation::CommitTrie, address).await?;
        {
            let mut state = self.state.lock();
            let account = state
                .accounts
                .get_mut(address)
                .ok_or_else(|| GatewayError::Backend("Account not found".to_string()))?;
            let staged = std::mem::take(&mut account.staged);
            account.committed.extend(staged);
            account.commits += 1;
        }
        self.envelope(address)
    }

    async fn read_value(
        &self,
        address: &Address,
        key: &HexBlob,
    ) -> Result<ValueReading, GatewayError> {
        self.enter(Operation::ReadValue, address).await?;
        let slot = slot_hex("key", key)?;
        let state = self.state.lock();
        let account = state
            .accounts
            .get(address)
            .ok_or_else(|| GatewayError::Backend("Account not found".to_string()))?;
        let stored = account.committed.get(&slot);
        let trimmed = stored.map_or("", |v| v.trim_start_matches('0'));
        Ok(ValueReading {
            address: Some(address.to_string()),
            key: Some(key.to_string()),
            value: if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() },
            original_match: stored.is_some(),
        })
    }

    async fn read_proof(
        &self,
        address: &Address,
        key: &HexBlob,
        root: &str,
    ) -> Result<ProofReading, GatewayError> {
        self.enter(Operation::ReadProof, address).await?;
        let slot = slot_hex("key", key)?;
        let state = self.state.lock();
        let account = state
            .accounts
            .get(address)
            .ok_or_else(|| GatewayError::Backend("Account not found".to_string()))?;
        if root != synthetic_root(account.commits) {
            return Err(GatewayError::Backend(
                "Failed to verify proof: unknown root".to_string(),
            ));
        }
        Ok(ProofReading {
            root_hash: Some(root.to_string()),
            value: account.committed.get(&slot).cloned().unwrap_or_default(),
        })
    }
}

// =============================================================================
// TRIE CONSTRUCTION
// =============================================================================

/// Left-pad to a 32-byte slot, lowercase, no prefix.
fn slot_hex(field: &str, blob: &HexBlob) -> Result<String, GatewayError> {
    let digits = strip_hex_prefix(blob.as_str()).to_ascii_lowercase();
    if digits.len() > SLOT_HEX_DIGITS {
        return Err(GatewayError::Backend(format!(
            "Invalid {field} format: hex number > 256 bits"
        )));
    }
    Ok(format!("{digits:0>SLOT_HEX_DIGITS$}"))
}

fn synthetic_root(commits: u64) -> String {
    format!("0x{commits:064x}")
}

fn trie_payload(account: &AccountStorage) -> TriePayload {
    if account.committed.is_empty() {
        return TriePayload {
            root_hash: Some("-".to_string()),
            text_data: Some("No trie data available.".to_string()),
            ..TriePayload::default()
        };
    }

    let entries: Vec<(&str, &str)> = account
        .committed
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let root = build_node(&entries, "", None, 0);

    TriePayload {
        root_hash: Some(synthetic_root(account.commits)),
        text_data: None,
        text_string: None,
        trie_data: serde_json::to_string(&root).ok().map(serde_json::Value::String),
        original_kv_pairs: Some(
            account
                .committed
                .iter()
                .map(|(k, v)| OriginalKvPair {
                    original_key: format!("0x{k}"),
                    original_value: format!("0x{v}"),
                    key_hex: k.clone(),
                    value_hex: v.clone(),
                })
                .collect(),
        ),
    }
}

/// Build a node over `(remaining nibbles, value)` entries of equal length.
fn build_node(entries: &[(&str, &str)], path: &str, slot: Option<usize>, depth: u32) -> RawTrieNode {
    // Zero is dropped on the wire, as the real backend does.
    let branch_index = slot.filter(|s| *s != 0).map(|s| s as i64);

    if let [(key, value)] = entries {
        return RawTrieNode {
            node_type: "shortNode_value".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            is_leaf: true,
            key_path: format!("{path}{key}"),
            branch_index,
            depth,
            ..RawTrieNode::default()
        };
    }

    let prefix = common_prefix(entries);
    if !prefix.is_empty() {
        let stripped: Vec<(&str, &str)> = entries
            .iter()
            .map(|(k, v)| (&k[prefix.len()..], *v))
            .collect();
        let child_path = format!("{path}{prefix}");
        return RawTrieNode {
            node_type: "shortNode_extension".to_string(),
            key: prefix.to_string(),
            key_path: child_path.clone(),
            branch_index,
            depth,
            children: vec![build_node(&stripped, &child_path, None, depth + 1)],
            ..RawTrieNode::default()
        };
    }

    let mut groups: BTreeMap<usize, Vec<(&str, &str)>> = BTreeMap::new();
    for (key, value) in entries {
        let nibble = key
            .chars()
            .next()
            .and_then(|c| c.to_digit(16))
            .map_or(0, |d| d as usize);
        groups.entry(nibble).or_default().push((&key[1..], *value));
    }

    let slot_map = (0..16)
        .map(|i| (format!("{i:x}"), groups.contains_key(&i)))
        .collect();
    let children = groups
        .iter()
        .map(|(nibble, group)| {
            build_node(group, &format!("{path}{nibble:x}"), Some(*nibble), depth + 1)
        })
        .collect::<Vec<_>>();

    RawTrieNode {
        node_type: "branch".to_string(),
        key_path: path.to_string(),
        branch_index,
        depth,
        filled_slot_count: children.len() as u32,
        total_slot_count: 16,
        slot_map,
        children,
        ..RawTrieNode::default()
    }
}

fn common_prefix<'a>(entries: &[(&'a str, &str)]) -> &'a str {
    let Some((first, _)) = entries.first() else {
        return "";
    };
    let mut len = first.len();
    for (key, _) in &entries[1..] {
        len = first
            .bytes()
            .zip(key.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    &first[..len]
}
