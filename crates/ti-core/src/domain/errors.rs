//! # Inspector Errors
//!
//! Every failure is recoverable at the UI boundary. Local conditions are
//! raised before any backend call is attempted and leave state untouched.

use thiserror::Error;

/// Errors surfaced by inspector operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InspectorError {
    /// Address is not `0x` followed by 1 to 40 hex digits.
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Key or value is not `0x` followed by one or more hex digits.
    #[error("Invalid hex {field} {input:?}: expected 0x followed by hex digits")]
    InvalidHex { field: &'static str, input: String },

    /// Account was never registered.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// A mutating call for this account is still outstanding.
    #[error("Account {0} is busy: a commit is already in flight")]
    Busy(String),

    /// `trieData` could not be decoded into a node tree.
    #[error("Malformed trie data: {0}")]
    MalformedTrieData(String),

    /// Transport failure, timeout, non-success status or backend `error` field.
    #[error("{0}")]
    BackendUnavailable(String),

    /// Operation requires a selected account.
    #[error("No account selected")]
    NoAccountSelected,

    /// Commit requested with an empty edit buffer.
    #[error("Nothing staged for account {0}")]
    NothingStaged(String),

    /// Proof read requested before any root hash is known.
    #[error("No root hash known for account {0}; commit or refresh first")]
    NoRootHash(String),
}

impl InspectorError {
    /// Whether the error was raised without contacting the backend.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            InspectorError::BackendUnavailable(_) | InspectorError::MalformedTrieData(_)
        )
    }
}

/// Result alias for inspector operations.
pub type InspectorResult<T> = Result<T, InspectorError>;
