//! JSON-over-HTTP client implementing the backend gateway port.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::{
    AddressRequest, ErrorEnvelope, ProofReading, ProofRequest, StorageUpdateRequest,
    TrieEnvelope, ValueReading, ValueRequest,
};
use ti_core::{Address, BackendGateway, GatewayError, GatewayRoutes, HexBlob, InspectorConfig, PendingEdits};
use tracing::debug;

/// Longest slice of a non-JSON error body carried into a status error.
const MAX_ERROR_BODY: usize = 200;

/// Gateway that POSTs JSON bodies to the configured routes.
pub struct HttpGateway {
    http_client: reqwest::Client,
    config: InspectorConfig,
}

impl HttpGateway {
    pub fn new(config: &InspectorConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn routes(&self) -> &GatewayRoutes {
        &self.config.routes
    }

    /// POST `body` to `path` and decode the reply.
    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        decode_reply(status, &text)
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.config.request_timeout)
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Map a status and body to a reply. An `error` field wins over the
/// status; a non-2xx status without one becomes `Status`.
fn decode_reply<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, GatewayError> {
    if let Some(envelope) = ErrorEnvelope::from_body(body) {
        return Err(GatewayError::Backend(envelope.error));
    }
    if !(200..300).contains(&status) {
        let message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
        return Err(GatewayError::Status { status, message });
    }
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn address_request(address: &Address) -> AddressRequest {
    AddressRequest {
        address: address.to_string(),
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn create_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.post(&self.routes().create_account, &address_request(address))
            .await
    }

    async fn select_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.post(&self.routes().select_account, &address_request(address))
            .await
    }

    async fn update_storage(
        &self,
        address: &Address,
        storage: &PendingEdits,
    ) -> Result<TrieEnvelope, GatewayError> {
        let body = StorageUpdateRequest {
            address: address.to_string(),
            storage: storage
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        self.post(&self.routes().update_storage, &body).await
    }

    async fn commit_trie(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.post(&self.routes().commit_trie, &address_request(address))
            .await
    }

    async fn read_value(
        &self,
        address: &Address,
        key: &HexBlob,
    ) -> Result<ValueReading, GatewayError> {
        let body = ValueRequest {
            address: address.to_string(),
            key: key.to_string(),
        };
        self.post(&self.routes().read_value, &body).await
    }

    async fn read_proof(
        &self,
        address: &Address,
        key: &HexBlob,
        root: &str,
    ) -> Result<ProofReading, GatewayError> {
        let body = ProofRequest {
            address: address.to_string(),
            key: key.to_string(),
            root: root.to_string(),
        };
        self.post(&self.routes().read_proof, &body).await
    }
}
