//! # Normalized Trie Nodes
//!
//! Closed set of node shapes the inspector renders. Rebuilt wholesale from
//! every backend response and never mutated afterwards.

use serde::Serialize;

/// Slots of a branch node.
pub const BRANCH_WIDTH: usize = 16;

// =============================================================================
// NODE
// =============================================================================

/// A node of the decoded trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrieNode {
    /// 16-way fan-out.
    Branch(BranchNode),
    /// Path-compressed node with exactly one child.
    Extension(ExtensionNode),
    /// Terminal key/value node.
    Leaf(LeafNode),
    /// Unresolved subtree, known only by its digest.
    HashRef(HashRefNode),
    /// Node type the backend reported but the inspector does not know.
    /// Shown as-is and never descended into.
    Opaque(OpaqueNode),
}

/// Fields every variant may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeHeader {
    /// Hex digest of the subtree.
    pub hash: Option<String>,
    /// Accumulated nibble path from the root.
    pub key_path: Option<String>,
    /// Slot under the parent branch; `None` at the root and under extensions.
    pub branch_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchNode {
    pub header: NodeHeader,
    pub children: Box<[Option<TrieNode>; BRANCH_WIDTH]>,
    /// Occupancy by slot, including slots whose child was not transmitted.
    pub occupancy: [bool; BRANCH_WIDTH],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionNode {
    pub header: NodeHeader,
    /// Shared key segment.
    pub key: String,
    pub child: Box<TrieNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafNode {
    pub header: NodeHeader,
    /// Remaining key segment; `None` for a bare value node.
    pub key: Option<String>,
    /// Stored (encoded) value as hex.
    pub value: String,
    pub original_key: Option<String>,
    pub original_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashRefNode {
    pub header: NodeHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueNode {
    pub header: NodeHeader,
    /// Type string exactly as reported, e.g. `unknown (*trie.fooNode)`.
    pub node_type: String,
    pub value: Option<String>,
}

/// Discriminant of [`TrieNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Branch,
    Extension,
    Leaf,
    HashRef,
    Opaque,
}

impl NodeKind {
    /// Upper-case label used in display boxes.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Branch => "BRANCH NODE",
            NodeKind::Extension => "EXTENSION NODE",
            NodeKind::Leaf => "LEAF NODE",
            NodeKind::HashRef => "HASH NODE",
            NodeKind::Opaque => "UNKNOWN NODE",
        }
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

impl TrieNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            TrieNode::Branch(_) => NodeKind::Branch,
            TrieNode::Extension(_) => NodeKind::Extension,
            TrieNode::Leaf(_) => NodeKind::Leaf,
            TrieNode::HashRef(_) => NodeKind::HashRef,
            TrieNode::Opaque(_) => NodeKind::Opaque,
        }
    }

    pub fn header(&self) -> &NodeHeader {
        match self {
            TrieNode::Branch(n) => &n.header,
            TrieNode::Extension(n) => &n.header,
            TrieNode::Leaf(n) => &n.header,
            TrieNode::HashRef(n) => &n.header,
            TrieNode::Opaque(n) => &n.header,
        }
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + match self {
            TrieNode::Branch(b) => b.present_children().map(|(_, c)| c.node_count()).sum(),
            TrieNode::Extension(e) => e.child.node_count(),
            TrieNode::Leaf(_) | TrieNode::HashRef(_) | TrieNode::Opaque(_) => 0,
        }
    }

    /// Leaves of this subtree in depth-first, ascending-slot order.
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafNode>) {
        match self {
            TrieNode::Branch(b) => {
                for (_, child) in b.present_children() {
                    child.collect_leaves(out);
                }
            }
            TrieNode::Extension(e) => e.child.collect_leaves(out),
            TrieNode::Leaf(leaf) => out.push(leaf),
            TrieNode::HashRef(_) | TrieNode::Opaque(_) => {}
        }
    }
}

impl BranchNode {
    /// Children paired with their slot, in ascending slot order.
    pub fn present_children(&self) -> impl Iterator<Item = (u8, &TrieNode)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.as_ref().map(|c| (slot as u8, c)))
    }

    pub fn filled_slot_count(&self) -> usize {
        self.occupancy.iter().filter(|filled| **filled).count()
    }
}
