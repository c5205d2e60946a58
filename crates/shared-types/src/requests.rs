//! # Request Bodies
//!
//! One struct per backend operation. All are POSTed as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body for account creation, selection and trie commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Canonical `0x`-prefixed account address.
    pub address: String,
}

/// Body for a batched storage write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUpdateRequest {
    /// Canonical `0x`-prefixed account address.
    pub address: String,
    /// Staged key to value pairs, both `0x`-prefixed hex.
    pub storage: BTreeMap<String, String>,
}

/// Body for a single storage value read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRequest {
    pub address: String,
    pub key: String,
}

/// Body for a proof read against a known root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    pub address: String,
    pub key: String,
    /// Root hash the proof is resolved against.
    pub root: String,
}
