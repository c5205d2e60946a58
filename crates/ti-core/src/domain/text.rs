//! # Text Serializer
//!
//! Flat, indented dump of a node tree in the same layout the backend uses
//! for `textData`. Used when a response carries `trieData` but no text.

use super::hex::{strip_hex_prefix, trim_leading_zeros};
use super::node::{TrieNode, BRANCH_WIDTH};
use std::fmt::{self, Write};

/// Header line of every dump.
pub const TEXT_HEADER: &str = "Hierarchy:";

/// Display adapter writing the dump of a tree.
pub struct TextDump<'a>(pub &'a TrieNode);

impl fmt::Display for TextDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TEXT_HEADER}")?;
        write_node(f, self.0, "", 0, true, "")
    }
}

/// Serialize a tree to text.
pub fn render_text(root: &TrieNode) -> String {
    TextDump(root).to_string()
}

fn write_node(
    w: &mut impl Write,
    node: &TrieNode,
    prefix: &str,
    depth: usize,
    is_last: bool,
    path: &str,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let connector = if is_last { "└─" } else { "├─" };

    match node {
        TrieNode::Leaf(leaf) => match &leaf.key {
            Some(key) => {
                write_short_header(w, &indent, prefix, connector, key, path)?;
                writeln!(w, "{indent}   Value: {}", trim_leading_zeros(&leaf.value))?;
                if depth == 0 {
                    writeln!(w, "{indent}   (Root Node)")?;
                }
                Ok(())
            }
            None => writeln!(
                w,
                "{indent}{prefix}{connector} Value Node: {}",
                strip_hex_prefix(&leaf.value)
            ),
        },
        TrieNode::Extension(ext) => {
            write_short_header(w, &indent, prefix, connector, &ext.key, path)?;
            if depth == 0 {
                writeln!(w, "{indent}   (Root Node)")?;
            }
            let child_path = format!("{path}{}", ext.key);
            write_node(w, &ext.child, "", depth + 1, true, &child_path)
        }
        TrieNode::Branch(branch) => {
            writeln!(w, "{indent}{prefix}{connector} Branch Node")?;
            if !path.is_empty() {
                writeln!(w, "{indent}   Path Prefix: {path}")?;
            }
            let filled = branch.filled_slot_count();
            if filled > 0 {
                writeln!(w, "{indent}   Slots filled: {filled}/{BRANCH_WIDTH}")?;
            } else {
                writeln!(w, "{indent}   Empty Branch (no slots filled)")?;
            }

            let present = branch.present_children().count();
            let mut seen = 0;
            for (slot, child) in branch.children.iter().enumerate() {
                let slot_prefix = format!("[{slot:x}] ");
                match child {
                    Some(child) => {
                        seen += 1;
                        let child_path = format!("{path}{slot:x}");
                        write_node(w, child, &slot_prefix, depth + 1, seen == present, &child_path)?;
                    }
                    None => {
                        let nil = if seen < present { "├─" } else { "└─" };
                        writeln!(w, "{indent}{slot_prefix}{nil} Nil")?;
                    }
                }
            }
            Ok(())
        }
        TrieNode::HashRef(hash_ref) => {
            let hash = hash_ref.header.hash.as_deref().map(strip_hex_prefix).unwrap_or("");
            writeln!(w, "{indent}{prefix}{connector} Hash Node: {}", abbreviate(hash))
        }
        TrieNode::Opaque(opaque) => {
            writeln!(w, "{indent}{prefix}{connector} Node type: {}", opaque.node_type)?;
            if let Some(value) = &opaque.value {
                writeln!(w, "{indent}   Value: {value}")?;
            }
            Ok(())
        }
    }
}

fn write_short_header(
    w: &mut impl Write,
    indent: &str,
    prefix: &str,
    connector: &str,
    key: &str,
    path: &str,
) -> fmt::Result {
    writeln!(w, "{indent}{prefix}{connector} Short Node")?;
    writeln!(w, "{indent}   Key: {key}")?;
    let full_path = format!("{path}{key}");
    if full_path != key {
        writeln!(w, "{indent}   Full Path: {full_path}")?;
    }
    Ok(())
}

/// First and last 16 characters of a long digest.
pub fn abbreviate(hash: &str) -> String {
    if hash.len() > 32 && hash.is_ascii() {
        format!("{}...{}", &hash[..16], &hash[hash.len() - 16..])
    } else {
        hash.to_string()
    }
}
