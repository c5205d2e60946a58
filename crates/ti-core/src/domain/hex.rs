//! # Hex Validators
//!
//! Shape checks for addresses and storage blobs, plus the display-only
//! leading-zero trim. No byte decoding happens here; the backend owns that.

use super::errors::{InspectorError, InspectorResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Hex digits in a canonical address.
pub const ADDRESS_HEX_DIGITS: usize = 40;

// =============================================================================
// ADDRESS
// =============================================================================

/// Canonical account address: `0x` plus exactly 40 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Normalize user input into a canonical address.
    ///
    /// A partial tail of 1 to 39 digits is left-padded with zeros.
    /// Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> InspectorResult<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| InspectorError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let digits = trimmed
            .strip_prefix("0x")
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if digits.is_empty() {
            return Err(invalid("no hex digits after 0x"));
        }
        if !is_hex_digits(digits) {
            return Err(invalid("contains non-hex characters"));
        }
        if digits.len() > ADDRESS_HEX_DIGITS {
            return Err(invalid("more than 40 hex digits"));
        }

        Ok(Self(format!(
            "0x{:0>width$}",
            digits.to_ascii_lowercase(),
            width = ADDRESS_HEX_DIGITS
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for narrow displays, e.g. `0x0000…00ab`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = InspectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

// =============================================================================
// HEX BLOB
// =============================================================================

/// Variable-width storage key or value: `0x` plus one or more hex digits.
///
/// Stored exactly as entered; no case folding or zero trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexBlob(String);

impl HexBlob {
    /// Validate a key or value. `field` names the input in the error.
    pub fn parse(field: &'static str, input: &str) -> InspectorResult<Self> {
        let trimmed = input.trim();
        match trimmed.strip_prefix("0x") {
            Some(digits) if !digits.is_empty() && is_hex_digits(digits) => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(InspectorError::InvalidHex {
                field,
                input: input.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for HexBlob {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn is_hex_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Remove a single leading `0x` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Ensure a `0x` prefix, leaving empty input empty.
pub fn with_hex_prefix(s: &str) -> String {
    if s.is_empty() || s.starts_with("0x") {
        s.to_string()
    } else {
        format!("0x{s}")
    }
}

/// Presentation-only trim: `0x00ab` becomes `0xab`, `0x0000` becomes `0x0`.
pub fn trim_leading_zeros(s: &str) -> String {
    let trimmed = strip_hex_prefix(s).trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{trimmed}")
    }
}
