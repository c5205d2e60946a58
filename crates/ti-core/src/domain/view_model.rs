//! # Trie View-Model Builder
//!
//! Pure transform from a backend trie payload to everything the display
//! needs. Decode failures degrade to an empty view-model and are reported
//! next to it instead of being raised. Backend text survives either way.

use super::correlator::NodeCorrelator;
use super::decode::decode_trie_data;
use super::errors::InspectorError;
use super::node::TrieNode;
use super::text::render_text;
use crate::config::DEFAULT_MAX_TRIE_DEPTH;
use shared_types::{OriginalKvPair, TrieEnvelope, TriePayload};
use tracing::{debug, warn};

/// Root hash shown when the backend supplies none.
pub const ROOT_HASH_SENTINEL: &str = "-";

/// Text shown when there is no node tree.
pub const NO_TRIE_TEXT: &str = "No trie data available.";

/// Display-ready snapshot of one account's trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieViewModel {
    /// Backend root hash or [`ROOT_HASH_SENTINEL`].
    pub root_hash: String,
    /// Text projection.
    pub text: String,
    /// Decoded tree, absent for empty view-models.
    pub tree: Option<TrieNode>,
    /// Pair list handed unmodified to the correlator.
    pub original_pairs: Vec<OriginalKvPair>,
}

impl TrieViewModel {
    /// View-model without a tree. Keeps the root hash when one is known.
    pub fn empty(root_hash: Option<&str>) -> Self {
        Self {
            root_hash: root_hash.unwrap_or(ROOT_HASH_SENTINEL).to_string(),
            text: NO_TRIE_TEXT.to_string(),
            tree: None,
            original_pairs: Vec::new(),
        }
    }

    /// Root hash unless it is the sentinel.
    pub fn known_root_hash(&self) -> Option<&str> {
        (self.root_hash != ROOT_HASH_SENTINEL).then_some(self.root_hash.as_str())
    }

    /// Replace the placeholder with backend-supplied text, if any.
    pub fn with_text(mut self, text: Option<&str>) -> Self {
        if let Some(text) = text {
            self.text = text.to_string();
        }
        self
    }

    pub fn correlator(&self) -> NodeCorrelator<'_> {
        NodeCorrelator::new(&self.original_pairs)
    }
}

/// A view-model plus the decode failure it degraded from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub view_model: TrieViewModel,
    pub degraded: Option<InspectorError>,
}

/// Builds view-models with a bounded decode depth.
#[derive(Debug, Clone, Copy)]
pub struct ViewModelBuilder {
    max_depth: usize,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIE_DEPTH)
    }
}

impl ViewModelBuilder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Build from a whole response envelope. A missing `trie` yields an
    /// empty view-model without an error.
    pub fn build_envelope(&self, envelope: &TrieEnvelope) -> BuildOutcome {
        match &envelope.trie {
            Some(payload) => self.build(payload),
            None => BuildOutcome {
                view_model: TrieViewModel::empty(None),
                degraded: None,
            },
        }
    }

    pub fn build(&self, payload: &TriePayload) -> BuildOutcome {
        let root_hash = payload.root_hash.as_deref();

        let tree = match decode_trie_data(payload.trie_data.as_ref(), self.max_depth) {
            Ok(Some(tree)) => tree,
            Ok(None) => {
                debug!(root_hash = ?root_hash, "Payload carries no trie data");
                return BuildOutcome {
                    view_model: TrieViewModel::empty(root_hash).with_text(payload.supplied_text()),
                    degraded: None,
                };
            }
            Err(err) => {
                warn!(root_hash = ?root_hash, error = %err, "Degrading to empty view-model");
                return BuildOutcome {
                    view_model: TrieViewModel::empty(root_hash).with_text(payload.supplied_text()),
                    degraded: Some(err),
                };
            }
        };

        let text = match payload.supplied_text() {
            Some(text) => text.to_string(),
            None => render_text(&tree),
        };

        let view_model = TrieViewModel {
            root_hash: root_hash.unwrap_or(ROOT_HASH_SENTINEL).to_string(),
            text,
            tree: Some(tree),
            original_pairs: payload.original_pairs().to_vec(),
        };

        if let Some(tree) = &view_model.tree {
            debug!(
                root_hash = %view_model.root_hash,
                nodes = tree.node_count(),
                leaves = tree.leaves().len(),
                resolved = view_model.correlator().resolved_count(tree),
                "View-model built"
            );
        }

        BuildOutcome {
            view_model,
            degraded: None,
        }
    }
}
