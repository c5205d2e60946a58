//! # Trie Payloads
//!
//! Envelope returned by account creation, selection, batch update and
//! commit, plus the raw node record carried inside `trieData`.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, NoneAsEmptyString};
use std::collections::BTreeMap;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Top-level response of every trie-producing operation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrieEnvelope {
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub address: Option<String>,
    /// Absent when the backend has no trie for the account yet.
    #[serde(default)]
    pub trie: Option<TriePayload>,
}

/// The trie snapshot of one account.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriePayload {
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub root_hash: Option<String>,
    /// Pre-rendered flat text dump.
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub text_data: Option<String>,
    /// Legacy duplicate of `textData`, kept for older servers.
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub text_string: Option<String>,
    /// Node tree, either as an embedded object or as a JSON-encoded string.
    #[serde(default)]
    pub trie_data: Option<serde_json::Value>,
    #[serde(default, rename = "originalKVPairs")]
    pub original_kv_pairs: Option<Vec<OriginalKvPair>>,
}

impl TriePayload {
    /// Text projection supplied by the backend, preferring `textData`.
    pub fn supplied_text(&self) -> Option<&str> {
        self.text_data
            .as_deref()
            .or(self.text_string.as_deref())
    }

    /// Original pairs, treating `null` as an empty list.
    pub fn original_pairs(&self) -> &[OriginalKvPair] {
        self.original_kv_pairs.as_deref().unwrap_or(&[])
    }
}

/// Out-of-band hint relating a pre-hash key/value to its hex forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OriginalKvPair {
    /// `0x`-prefixed key before hashing.
    pub original_key: String,
    /// `0x`-prefixed value before encoding.
    pub original_value: String,
    /// Key bytes as bare hex.
    pub key_hex: String,
    /// Value bytes as bare hex.
    pub value_hex: String,
}

// =============================================================================
// RAW NODE RECORD
// =============================================================================

/// One node of `trieData`, exactly as the backend marshals it.
///
/// Every field is optional on the wire. In particular `branchIndex` is
/// dropped when it is zero, so slot recovery cannot rely on it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTrieNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub key: String,
    pub original_key: String,
    pub value: String,
    pub original_value: String,
    pub hash: String,
    pub branch_index: Option<i64>,
    pub children: Vec<RawTrieNode>,
    pub depth: u32,
    pub is_leaf: bool,
    pub key_path: String,
    pub hashed_key_path: String,
    /// Occupancy keyed by lowercase hex digit.
    pub slot_map: BTreeMap<String, bool>,
    pub filled_slot_count: u32,
    pub total_slot_count: u32,
}
