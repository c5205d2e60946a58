//! # Trie Data Decoding
//!
//! Turns the backend's `trieData` into a [`TrieNode`] tree. The backend
//! marshals several overlapping node-type strings and omits zero-valued
//! fields, so slot positions are recovered from paths when missing.

use super::errors::{InspectorError, InspectorResult};
use super::node::{
    BranchNode, ExtensionNode, HashRefNode, LeafNode, NodeHeader, OpaqueNode, TrieNode,
    BRANCH_WIDTH,
};
use shared_types::RawTrieNode;
use tracing::warn;

/// Decode `trieData` as received.
///
/// Accepts a JSON string holding the encoded tree or an embedded object.
/// Returns `Ok(None)` when the field is absent, null, or an empty string.
pub fn decode_trie_data(
    trie_data: Option<&serde_json::Value>,
    max_depth: usize,
) -> InspectorResult<Option<TrieNode>> {
    let raw: RawTrieNode = match trie_data {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(serde_json::Value::String(s)) => serde_json::from_str(s)
            .map_err(|e| InspectorError::MalformedTrieData(format!("invalid JSON: {e}")))?,
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| InspectorError::MalformedTrieData(format!("invalid node record: {e}")))?,
        Some(other) => {
            return Err(InspectorError::MalformedTrieData(format!(
                "expected string or object, got {}",
                json_type_name(other)
            )))
        }
    };
    decode_node(&raw, None, 0, max_depth).map(Some)
}

/// Decode an already-parsed raw root node.
pub fn decode_tree(raw: &RawTrieNode, max_depth: usize) -> InspectorResult<TrieNode> {
    decode_node(raw, None, 0, max_depth)
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Branch,
    Extension,
    Leaf,
    BareValue,
    HashRef,
    Opaque,
}

fn classify(raw: &RawTrieNode) -> InspectorResult<RawKind> {
    match raw.node_type.as_str() {
        "branch" | "root_branch" | "fullNode" => Ok(RawKind::Branch),
        "shortNode_value" => Ok(RawKind::Leaf),
        "shortNode_extension" => Ok(RawKind::Extension),
        "short" | "root_short" | "shortNode" => {
            if raw.is_leaf || (raw.children.is_empty() && !raw.value.is_empty()) {
                Ok(RawKind::Leaf)
            } else {
                Ok(RawKind::Extension)
            }
        }
        "value" | "valueNode" => Ok(RawKind::BareValue),
        "hash" | "hashNode" => Ok(RawKind::HashRef),
        "" => Err(InspectorError::MalformedTrieData(format!(
            "node at path {:?} has no type",
            raw.key_path
        ))),
        other => {
            warn!(node_type = other, key_path = %raw.key_path, "Unrecognized node type; shown opaque");
            Ok(RawKind::Opaque)
        }
    }
}

// =============================================================================
// RECURSIVE DECODE
// =============================================================================

fn decode_node(
    raw: &RawTrieNode,
    branch_index: Option<u8>,
    depth: usize,
    max_depth: usize,
) -> InspectorResult<TrieNode> {
    if depth > max_depth {
        return Err(InspectorError::MalformedTrieData(format!(
            "tree deeper than {max_depth} levels"
        )));
    }

    let header = NodeHeader {
        hash: non_empty(&raw.hash),
        key_path: non_empty(&raw.key_path),
        branch_index,
    };

    match classify(raw)? {
        RawKind::Branch => decode_branch(raw, header, depth, max_depth),
        RawKind::Extension => {
            let [child] = raw.children.as_slice() else {
                return Err(InspectorError::MalformedTrieData(format!(
                    "extension node at path {:?} has {} children, expected 1",
                    raw.key_path,
                    raw.children.len()
                )));
            };
            Ok(TrieNode::Extension(ExtensionNode {
                header,
                key: raw.key.clone(),
                child: Box::new(decode_node(child, None, depth + 1, max_depth)?),
            }))
        }
        RawKind::Leaf | RawKind::BareValue => Ok(TrieNode::Leaf(LeafNode {
            header,
            key: non_empty(&raw.key),
            value: raw.value.clone(),
            original_key: non_empty(&raw.original_key),
            original_value: non_empty(&raw.original_value),
        })),
        RawKind::HashRef => Ok(TrieNode::HashRef(HashRefNode { header })),
        RawKind::Opaque => Ok(TrieNode::Opaque(OpaqueNode {
            header,
            node_type: raw.node_type.clone(),
            value: non_empty(&raw.value),
        })),
    }
}

fn decode_branch(
    raw: &RawTrieNode,
    header: NodeHeader,
    depth: usize,
    max_depth: usize,
) -> InspectorResult<TrieNode> {
    if raw.children.len() > BRANCH_WIDTH {
        return Err(InspectorError::MalformedTrieData(format!(
            "branch at path {:?} has {} children",
            raw.key_path,
            raw.children.len()
        )));
    }

    let mut occupancy = [false; BRANCH_WIDTH];
    for (digit, filled) in &raw.slot_map {
        if let Some(slot) = single_hex_digit(digit) {
            occupancy[slot as usize] = *filled;
        }
    }

    // Slots announced by slotMap, handed out to children whose index was omitted.
    let mut announced = occupancy
        .iter()
        .enumerate()
        .filter(|(_, filled)| **filled)
        .map(|(slot, _)| slot as u8)
        .collect::<Vec<_>>()
        .into_iter();

    let mut children: [Option<TrieNode>; BRANCH_WIDTH] = std::array::from_fn(|_| None);
    for child in &raw.children {
        let slot = explicit_slot(child)?
            .or_else(|| slot_from_path(&raw.key_path, &child.key_path))
            .or_else(|| announced.find(|s| children[*s as usize].is_none()))
            .or_else(|| (0..BRANCH_WIDTH as u8).find(|s| children[*s as usize].is_none()))
            .ok_or_else(|| {
                InspectorError::MalformedTrieData(format!(
                    "branch at path {:?} has no free slot left",
                    raw.key_path
                ))
            })?;

        let index = slot as usize;
        if children[index].is_some() {
            return Err(InspectorError::MalformedTrieData(format!(
                "branch at path {:?} has two children in slot {slot:x}",
                raw.key_path
            )));
        }
        children[index] = Some(decode_node(child, Some(slot), depth + 1, max_depth)?);
        occupancy[index] = true;
    }

    Ok(TrieNode::Branch(BranchNode {
        header,
        children: Box::new(children),
        occupancy,
    }))
}

/// Slot from `branchIndex`. Negative values mean "not under a branch".
fn explicit_slot(child: &RawTrieNode) -> InspectorResult<Option<u8>> {
    match child.branch_index {
        None => Ok(None),
        Some(i) if i < 0 => Ok(None),
        Some(i) if i < BRANCH_WIDTH as i64 => Ok(Some(i as u8)),
        Some(i) => Err(InspectorError::MalformedTrieData(format!(
            "branch index {i} out of range"
        ))),
    }
}

/// The nibble that follows the parent's path in the child's path.
fn slot_from_path(parent_path: &str, child_path: &str) -> Option<u8> {
    let rest = child_path.strip_prefix(parent_path)?;
    let digit = rest.chars().next()?;
    digit.to_digit(16).map(|d| d as u8)
}

fn single_hex_digit(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let digit = chars.next()?.to_digit(16)?;
    chars.next().is_none().then_some(digit as u8)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
