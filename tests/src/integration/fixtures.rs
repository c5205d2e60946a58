//! Trie payload builders.

use serde_json::{json, Value};
use shared_types::{OriginalKvPair, TrieEnvelope, TriePayload};

/// Envelope around a payload with the given root and node JSON.
pub fn envelope(root: &str, trie_data: Value) -> TrieEnvelope {
    envelope_with_pairs(root, trie_data, Vec::new())
}

pub fn envelope_with_pairs(root: &str, trie_data: Value, pairs: Vec<OriginalKvPair>) -> TrieEnvelope {
    TrieEnvelope {
        status: Some("success".to_string()),
        address: None,
        trie: Some(TriePayload {
            root_hash: Some(root.to_string()),
            trie_data: Some(trie_data),
            original_kv_pairs: Some(pairs),
            ..TriePayload::default()
        }),
    }
}

/// A single-leaf trie.
pub fn leaf(key: &str, value: &str) -> Value {
    json!({
        "type": "shortNode_value",
        "isLeaf": true,
        "key": key,
        "value": value,
        "keyPath": key,
    })
}

/// A root branch whose children are given in the listed order.
pub fn branch(children: &[(u8, Value)]) -> Value {
    let nodes: Vec<Value> = children
        .iter()
        .map(|(slot, node)| {
            let mut node = node.clone();
            node["branchIndex"] = json!(slot);
            node
        })
        .collect();
    json!({
        "type": "root_branch",
        "hash": "0xb0",
        "children": nodes,
        "filledSlotCount": children.len(),
        "totalSlotCount": 16,
    })
}
