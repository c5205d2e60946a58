//! # Node Correlator
//!
//! Recovers the pre-hash key and value of a leaf. A value supplied on the
//! node itself wins; otherwise the out-of-band pair list is searched with
//! three strategies in fixed order, stopping at the first hit.

use super::hex::strip_hex_prefix;
use super::node::{LeafNode, TrieNode};
use serde::Serialize;
use shared_types::OriginalKvPair;

/// How an original value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    /// Supplied on the node by the backend.
    Direct,
    /// Pair whose `originalKey` equals the node's `originalKey`.
    OriginalKey,
    /// Pair whose `keyHex` equals the node key.
    KeyHex,
    /// Pair whose `valueHex` equals the node value.
    ValueHex,
}

/// Resolved original forms of one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correlation {
    pub original_key: Option<String>,
    pub original_value: String,
    pub strategy: MatchStrategy,
}

/// Matches leaves against the pair list of one view-model build.
#[derive(Debug, Clone, Copy)]
pub struct NodeCorrelator<'a> {
    pairs: &'a [OriginalKvPair],
}

impl<'a> NodeCorrelator<'a> {
    pub fn new(pairs: &'a [OriginalKvPair]) -> Self {
        Self { pairs }
    }

    /// Resolve a leaf. `None` means no annotation, which is not an error.
    pub fn resolve(&self, leaf: &LeafNode) -> Option<Correlation> {
        if let Some(original_value) = &leaf.original_value {
            return Some(Correlation {
                original_key: leaf.original_key.clone(),
                original_value: original_value.clone(),
                strategy: MatchStrategy::Direct,
            });
        }

        let by_original_key = leaf.original_key.as_deref().and_then(|key| {
            self.find(MatchStrategy::OriginalKey, |pair| same_hex(&pair.original_key, key))
        });

        by_original_key
            .or_else(|| {
                let key = leaf.key.as_deref()?;
                self.find(MatchStrategy::KeyHex, |pair| same_hex(&pair.key_hex, key))
            })
            .or_else(|| {
                self.find(MatchStrategy::ValueHex, |pair| {
                    same_hex(&pair.value_hex, &leaf.value)
                })
            })
            .map(|(pair, strategy)| Correlation {
                original_key: leaf
                    .original_key
                    .clone()
                    .or_else(|| (!pair.original_key.is_empty()).then(|| pair.original_key.clone())),
                original_value: pair.original_value.clone(),
                strategy,
            })
    }

    /// Number of leaves in `tree` that resolve to an original value.
    pub fn resolved_count(&self, tree: &TrieNode) -> usize {
        tree.leaves()
            .into_iter()
            .filter(|leaf| self.resolve(leaf).is_some())
            .count()
    }

    fn find(
        &self,
        strategy: MatchStrategy,
        predicate: impl Fn(&OriginalKvPair) -> bool,
    ) -> Option<(&'a OriginalKvPair, MatchStrategy)> {
        self.pairs
            .iter()
            .filter(|pair| !pair.original_value.is_empty())
            .find(|pair| predicate(pair))
            .map(|pair| (pair, strategy))
    }
}

/// Hex equality ignoring a `0x` prefix and letter case. Empty never matches.
fn same_hex(a: &str, b: &str) -> bool {
    let (a, b) = (strip_hex_prefix(a), strip_hex_prefix(b));
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}
