//! # Backend Gateway Port
//!
//! Request/response contract of the remote trie service. Transport and
//! encoding live in adapters; the core sees only typed replies.

use crate::domain::edits::PendingEdits;
use crate::domain::errors::InspectorError;
use crate::domain::hex::{Address, HexBlob};
use shared_types::{ProofReading, TrieEnvelope, ValueReading};
use std::time::Duration;
use thiserror::Error;

/// Error from backend operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Connection refused, reset, DNS failure and the like
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// Non-success status without an error envelope
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend `error` field, carried verbatim
    #[error("{0}")]
    Backend(String),

    /// Response body did not match the contract
    #[error("Unexpected backend response: {0}")]
    Decode(String),

    /// No response within the configured bound
    #[error("Backend did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl From<GatewayError> for InspectorError {
    fn from(err: GatewayError) -> Self {
        InspectorError::BackendUnavailable(err.to_string())
    }
}

/// Gateway to the trie backend.
///
/// Every call is an independent request/response exchange. Callers are
/// responsible for ordering and for bounding latency.
#[async_trait::async_trait]
pub trait BackendGateway: Send + Sync {
    /// Create the account if needed and return its trie.
    async fn create_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError>;

    /// Fetch the current trie of a known account.
    async fn select_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError>;

    /// Write a batch of key/value pairs.
    async fn update_storage(
        &self,
        address: &Address,
        storage: &PendingEdits,
    ) -> Result<TrieEnvelope, GatewayError>;

    /// Commit pending writes and return the resulting trie.
    async fn commit_trie(&self, address: &Address) -> Result<TrieEnvelope, GatewayError>;

    /// Read one stored value.
    async fn read_value(&self, address: &Address, key: &HexBlob)
        -> Result<ValueReading, GatewayError>;

    /// Read a value through a proof against `root`.
    async fn read_proof(
        &self,
        address: &Address,
        key: &HexBlob,
        root: &str,
    ) -> Result<ProofReading, GatewayError>;
}
