//! Backend error envelope.

use serde::{Deserialize, Serialize};

/// Body returned by the backend alongside a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable failure reason.
    pub error: String,
}

impl ErrorEnvelope {
    /// Try to read an error envelope out of an arbitrary response body.
    ///
    /// Returns `None` when the body is not JSON or has no string `error` field.
    pub fn from_body(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let error = value.get("error")?.as_str()?;
        Some(Self {
            error: error.to_string(),
        })
    }
}
