//! Inspector configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default decode depth limit. A 32-byte hashed key has 64 nibbles, so
/// honest tries never come close.
pub const DEFAULT_MAX_TRIE_DEPTH: usize = 128;

/// Longest accepted request timeout.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Main inspector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Base URL of the trie backend, e.g. `http://localhost:8080`
    pub backend_url: String,
    /// Upper bound on every backend call
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Endpoint paths
    pub routes: GatewayRoutes,
    /// Decode depth limit for `trieData`
    pub max_trie_depth: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
            routes: GatewayRoutes::default(),
            max_trie_depth: DEFAULT_MAX_TRIE_DEPTH,
        }
    }
}

/// Backend endpoint paths, one per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayRoutes {
    pub create_account: String,
    pub select_account: String,
    pub update_storage: String,
    pub commit_trie: String,
    pub read_value: String,
    pub read_proof: String,
}

impl Default for GatewayRoutes {
    fn default() -> Self {
        Self {
            create_account: "/api/account/create".to_string(),
            select_account: "/api/account/get".to_string(),
            // Batch write without commit, then a separate trie commit
            update_storage: "/api/storage/batch".to_string(),
            commit_trie: "/api/trie/update".to_string(),
            read_value: "/api/storage/get".to_string(),
            read_proof: "/api/proof".to_string(),
        }
    }
}

impl GatewayRoutes {
    fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("create_account", &self.create_account),
            ("select_account", &self.select_account),
            ("update_storage", &self.update_storage),
            ("commit_trie", &self.commit_trie),
            ("read_value", &self.read_value),
            ("read_proof", &self.read_proof),
        ]
    }
}

impl InspectorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidUrl("backend_url cannot be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(format!(
                "{url} must start with http:// or https://"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout cannot be 0".into(),
            ));
        }
        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(ConfigError::InvalidTimeout(format!(
                "request_timeout cannot exceed {}s",
                MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        for (name, path) in self.routes.all() {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidRoute {
                    name,
                    path: path.to_string(),
                });
            }
        }

        if self.max_trie_depth == 0 {
            return Err(ConfigError::Invalid("max_trie_depth cannot be 0".into()));
        }

        Ok(())
    }

    /// Full URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url.trim().trim_end_matches('/'), path)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Backend URL unusable
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Route path without a leading slash
    #[error("invalid route {name}: {path:?} must start with '/'")]
    InvalidRoute { name: &'static str, path: String },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s" and "m", which are its suffixes.
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
