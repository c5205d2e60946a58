//! # Inspector Service
//!
//! Runs [`GatewayCall`]s against a [`BackendGateway`] and turns the replies
//! into [`Completion`]s. Every call is bounded by the configured request
//! timeout; an expired call surfaces as `BackendUnavailable`.

use crate::config::InspectorConfig;
use crate::domain::{Completion, GatewayCall, InspectorResult, InspectorState};
use crate::domain::Address;
use crate::ports::{BackendGateway, GatewayError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Async side of the inspector.
pub struct InspectorService<G: BackendGateway> {
    gateway: Arc<G>,
    timeout: Duration,
}

impl<G: BackendGateway> Clone for InspectorService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            timeout: self.timeout,
        }
    }
}

impl<G: BackendGateway + 'static> InspectorService<G> {
    pub fn new(gateway: Arc<G>, config: &InspectorConfig) -> Self {
        Self::with_timeout(gateway, config.request_timeout)
    }

    pub fn with_timeout(gateway: Arc<G>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one call to completion.
    pub async fn execute(&self, call: GatewayCall) -> Completion {
        let operation = call.name();
        debug!(operation, address = %call.account(), "Dispatching gateway call");

        match call {
            GatewayCall::CreateAccount(ticket) => {
                let result = self
                    .bounded(operation, self.gateway.create_account(&ticket.account))
                    .await;
                Completion::Refresh { ticket, result }
            }
            GatewayCall::SelectAccount(ticket) => {
                let result = self
                    .bounded(operation, self.gateway.select_account(&ticket.account))
                    .await;
                Completion::Refresh { ticket, result }
            }
            GatewayCall::Commit(ticket) => {
                let result = self
                    .bounded(operation, async {
                        self.gateway
                            .update_storage(&ticket.account, &ticket.edits)
                            .await?;
                        self.gateway.commit_trie(&ticket.account).await
                    })
                    .await;
                Completion::Commit { ticket, result }
            }
            GatewayCall::ReadValue { account, key } => {
                let result = self
                    .bounded(operation, self.gateway.read_value(&account, &key))
                    .await;
                Completion::Value {
                    account,
                    key,
                    result,
                }
            }
            GatewayCall::ReadProof { account, key, root } => {
                let result = self
                    .bounded(operation, self.gateway.read_proof(&account, &key, &root))
                    .await;
                Completion::Proof {
                    account,
                    key,
                    root,
                    result,
                }
            }
        }
    }

    /// Run a call in the background and deliver its completion on `tx`.
    pub fn spawn(&self, call: GatewayCall, tx: mpsc::UnboundedSender<Completion>) {
        let service = self.clone();
        tokio::spawn(async move {
            let completion = service.execute(call).await;
            if tx.send(completion).is_err() {
                debug!("Completion receiver closed");
            }
        });
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> InspectorResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|err| {
                warn!(operation, error = %err, "Gateway call failed");
                err.into()
            }),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Gateway call timed out"
                );
                Err(GatewayError::Timeout(self.timeout).into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sequential helpers
    // -------------------------------------------------------------------------

    /// Register an address and wait for its trie.
    pub async fn register(&self, state: &mut InspectorState, input: &str) -> InspectorResult<Address> {
        let call = state.register(input)?;
        let account = call.account().clone();
        state.apply(self.execute(call).await)?;
        Ok(account)
    }

    /// Select an account and wait for its trie.
    pub async fn select(&self, state: &mut InspectorState, account: &Address) -> InspectorResult<()> {
        let call = state.select(account)?;
        state.apply(self.execute(call).await)
    }

    /// Commit the account's pending edits and wait for the new trie.
    pub async fn commit(&self, state: &mut InspectorState, account: &Address) -> InspectorResult<()> {
        let call = state.begin_commit(account)?;
        state.apply(self.execute(call).await)
    }

    pub async fn read_value(
        &self,
        state: &mut InspectorState,
        account: &Address,
        key: &str,
    ) -> InspectorResult<()> {
        let call = state.begin_value_read(account, key)?;
        state.apply(self.execute(call).await)
    }

    pub async fn read_proof(
        &self,
        state: &mut InspectorState,
        account: &Address,
        key: &str,
    ) -> InspectorResult<()> {
        let call = state.begin_proof_read(account, key)?;
        state.apply(self.execute(call).await)
    }
}
