//! # Tree Renderer
//!
//! Depth-first walk of a [`TrieNode`] tree into nested display boxes.
//! Branch slots are always visited `0` through `f`, empty ones included,
//! so the same trie always lays out identically.
//!
//! Boxes are surface-agnostic: the terminal front end styles them, and
//! [`DisplayBox`]'s `Display` impl emits them as nested text.

use super::correlator::NodeCorrelator;
use super::hex::{trim_leading_zeros, with_hex_prefix};
use super::node::{NodeKind, TrieNode, BRANCH_WIDTH};
use serde::Serialize;
use std::fmt;

/// One labeled line inside a box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

/// Child position of a box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayChild {
    Node(DisplayBox),
    /// Unoccupied branch slot kept for alignment.
    EmptySlot { slot: u8 },
}

/// A rendered node and its rendered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBox {
    pub kind: NodeKind,
    pub title: String,
    pub depth: usize,
    /// Slot under the parent branch.
    pub slot: Option<u8>,
    /// Non-empty fields in display order.
    pub fields: Vec<DisplayField>,
    /// Occupancy grid, branches only.
    pub slot_grid: Option<[bool; BRANCH_WIDTH]>,
    pub children: Vec<DisplayChild>,
}

impl DisplayBox {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    /// Boxes in this subtree, including this one.
    pub fn box_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                DisplayChild::Node(b) => b.box_count(),
                DisplayChild::EmptySlot { .. } => 0,
            })
            .sum::<usize>()
    }
}

/// Walks a node tree into display boxes.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer<'a> {
    correlator: NodeCorrelator<'a>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(correlator: NodeCorrelator<'a>) -> Self {
        Self { correlator }
    }

    /// Lay out the whole tree. `root_hash` fills the root box's hash field
    /// when the root node carries none.
    pub fn render(&self, root: &TrieNode, root_hash: Option<&str>) -> DisplayBox {
        self.render_node(root, 0, None, root_hash)
    }

    fn render_node(
        &self,
        node: &TrieNode,
        depth: usize,
        slot: Option<u8>,
        root_hash: Option<&str>,
    ) -> DisplayBox {
        let kind = node.kind();
        let header = node.header();
        let mut fields = Fields::default();
        let mut slot_grid = None;
        let mut children = Vec::new();

        match node {
            TrieNode::Branch(branch) => {
                fields.hex("Path Prefix", header.key_path.as_deref());
                slot_grid = Some(branch.occupancy);
                for (index, child) in branch.children.iter().enumerate() {
                    let index = index as u8;
                    children.push(match child {
                        Some(child) => DisplayChild::Node(self.render_node(
                            child,
                            depth + 1,
                            Some(index),
                            None,
                        )),
                        None => DisplayChild::EmptySlot { slot: index },
                    });
                }
            }
            TrieNode::Extension(ext) => {
                fields.hex("Key", Some(ext.key.as_str()));
                fields.full_path(header.key_path.as_deref(), Some(ext.key.as_str()));
                children.push(DisplayChild::Node(self.render_node(
                    &ext.child,
                    depth + 1,
                    None,
                    None,
                )));
            }
            TrieNode::Leaf(leaf) => {
                let resolved = self.correlator.resolve(leaf);
                let original_key = resolved.as_ref().and_then(|c| c.original_key.as_deref());
                let original_value = resolved.as_ref().map(|c| c.original_value.as_str());

                fields.hex("Key", leaf.key.as_deref());
                fields.trimmed("Original Key", original_key);
                fields.hex("Value", Some(leaf.value.as_str()));
                fields.trimmed("Original Value", original_value);
                fields.full_path(header.key_path.as_deref(), leaf.key.as_deref());
            }
            TrieNode::HashRef(_) => {}
            TrieNode::Opaque(opaque) => {
                fields.push("Node Type", opaque.node_type.clone());
                fields.hex("Value", opaque.value.as_deref());
            }
        }

        if depth == 0 {
            fields.hex("Root Hash", header.hash.as_deref().or(root_hash));
        } else {
            fields.hex("Node Hash", header.hash.as_deref());
        }

        if let TrieNode::Branch(branch) = node {
            fields.push(
                "Slots Filled",
                format!("{} out of {BRANCH_WIDTH}", branch.filled_slot_count()),
            );
        }

        DisplayBox {
            kind,
            title: title(kind, depth, slot),
            depth,
            slot,
            fields: fields.0,
            slot_grid,
            children,
        }
    }
}

fn title(kind: NodeKind, depth: usize, slot: Option<u8>) -> String {
    let mut title = String::new();
    if depth == 0 {
        title.push_str("ROOT ");
    }
    title.push_str(kind.label());
    if let Some(slot) = slot {
        title.push_str(&format!(" (Slot {slot:X})"));
    }
    title
}

/// Field list that silently drops empty values.
#[derive(Default)]
struct Fields(Vec<DisplayField>);

impl Fields {
    fn push(&mut self, label: &'static str, value: String) {
        if !value.is_empty() {
            self.0.push(DisplayField { label, value });
        }
    }

    fn hex(&mut self, label: &'static str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(label, with_hex_prefix(value));
        }
    }

    fn trimmed(&mut self, label: &'static str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(label, trim_leading_zeros(value));
        }
    }

    /// Accumulated path, shown only when it adds something over the key.
    fn full_path(&mut self, path: Option<&str>, key: Option<&str>) {
        if let Some(path) = path {
            if Some(path) != key {
                self.hex("Full Path", Some(path));
            }
        }
    }
}

// =============================================================================
// TEXT EMISSION
// =============================================================================

impl fmt::Display for DisplayBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "    ".repeat(self.depth);
        writeln!(f, "{indent}[{}]", self.title)?;
        for field in &self.fields {
            writeln!(f, "{indent}  {}: {}", field.label, field.value)?;
        }
        if let Some(grid) = &self.slot_grid {
            writeln!(f, "{indent}  Slots: {}", grid_text(grid))?;
        }
        for child in &self.children {
            match child {
                DisplayChild::Node(child) => write!(f, "{child}")?,
                DisplayChild::EmptySlot { slot } => {
                    writeln!(f, "{indent}    (Slot {slot:X}) empty")?
                }
            }
        }
        Ok(())
    }
}

/// `0 1 . 3 ...`: digit for a filled slot, dot for an empty one.
pub fn grid_text(grid: &[bool; BRANCH_WIDTH]) -> String {
    grid.iter()
        .enumerate()
        .map(|(slot, filled)| {
            if *filled {
                format!("{slot:X}")
            } else {
                ".".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
