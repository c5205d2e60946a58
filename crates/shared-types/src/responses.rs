//! # Read Responses
//!
//! Replies of the non-mutating value and proof reads.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, NoneAsEmptyString};

/// Reply of a single storage value read.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueReading {
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub address: Option<String>,
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub key: Option<String>,
    /// Stored value as hex with leading zeros already trimmed by the backend.
    #[serde(default)]
    pub value: String,
    /// Whether the stored value equals the value originally written.
    #[serde(default)]
    pub original_match: bool,
}

/// Reply of a proof read.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofReading {
    /// Root the proof was resolved against, when echoed back.
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub root_hash: Option<String>,
    /// Proven value as bare hex, empty when the key is absent.
    #[serde(default)]
    pub value: String,
}
