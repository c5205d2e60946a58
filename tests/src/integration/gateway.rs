//! Scripted backend gateway.
//!
//! Replies are queued per operation and handed out in order. An operation
//! with an empty queue answers with an empty success. Every request is
//! recorded with its full payload.

use parking_lot::Mutex;
use shared_types::{ProofReading, TrieEnvelope, ValueReading};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use ti_core::{Address, BackendGateway, GatewayError, HexBlob, Operation, PendingEdits};

/// A request as received by [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateAccount(Address),
    SelectAccount(Address),
    UpdateStorage { address: Address, storage: PendingEdits },
    CommitTrie(Address),
    ReadValue { address: Address, key: HexBlob },
    ReadProof { address: Address, key: HexBlob, root: String },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::CreateAccount(_) => Operation::CreateAccount,
            Request::SelectAccount(_) => Operation::SelectAccount,
            Request::UpdateStorage { .. } => Operation::UpdateStorage,
            Request::CommitTrie(_) => Operation::CommitTrie,
            Request::ReadValue { .. } => Operation::ReadValue,
            Request::ReadProof { .. } => Operation::ReadProof,
        }
    }
}

#[derive(Default)]
struct Script {
    tries: HashMap<Operation, VecDeque<Result<TrieEnvelope, GatewayError>>>,
    values: VecDeque<Result<ValueReading, GatewayError>>,
    proofs: VecDeque<Result<ProofReading, GatewayError>>,
    delays: HashMap<Operation, Duration>,
    requests: Vec<Request>,
}

/// Backend that answers from queued replies.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply of the next trie-returning call of `operation`.
    pub fn reply(&self, operation: Operation, reply: Result<TrieEnvelope, GatewayError>) {
        self.script
            .lock()
            .tries
            .entry(operation)
            .or_default()
            .push_back(reply);
    }

    pub fn reply_value(&self, reply: Result<ValueReading, GatewayError>) {
        self.script.lock().values.push_back(reply);
    }

    pub fn reply_proof(&self, reply: Result<ProofReading, GatewayError>) {
        self.script.lock().proofs.push_back(reply);
    }

    /// Hold every `operation` call for `delay` before answering.
    pub fn delay(&self, operation: Operation, delay: Duration) {
        self.script.lock().delays.insert(operation, delay);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().requests.clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|r| r.operation() == operation)
            .count()
    }

    async fn receive(&self, request: Request) {
        let delay = {
            let mut script = self.script.lock();
            let delay = script.delays.get(&request.operation()).copied();
            script.requests.push(request);
            delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn trie(&self, request: Request) -> Result<TrieEnvelope, GatewayError> {
        let operation = request.operation();
        self.receive(request).await;
        self.script
            .lock()
            .tries
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(TrieEnvelope::default()))
    }
}

#[async_trait::async_trait]
impl BackendGateway for ScriptedGateway {
    async fn create_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.trie(Request::CreateAccount(address.clone())).await
    }

    async fn select_account(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.trie(Request::SelectAccount(address.clone())).await
    }

    async fn update_storage(
        &self,
        address: &Address,
        storage: &PendingEdits,
    ) -> Result<TrieEnvelope, GatewayError> {
        self.trie(Request::UpdateStorage {
            address: address.clone(),
            storage: storage.clone(),
        })
        .await
    }

    async fn commit_trie(&self, address: &Address) -> Result<TrieEnvelope, GatewayError> {
        self.trie(Request::CommitTrie(address.clone())).await
    }

    async fn read_value(
        &self,
        address: &Address,
        key: &HexBlob,
    ) -> Result<ValueReading, GatewayError> {
        self.receive(Request::ReadValue {
            address: address.clone(),
            key: key.clone(),
        })
        .await;
        self.script
            .lock()
            .values
            .pop_front()
            .unwrap_or_else(|| Ok(ValueReading::default()))
    }

    async fn read_proof(
        &self,
        address: &Address,
        key: &HexBlob,
        root: &str,
    ) -> Result<ProofReading, GatewayError> {
        self.receive(Request::ReadProof {
            address: address.clone(),
            key: key.clone(),
            root: root.to_string(),
        })
        .await;
        self.script
            .lock()
            .proofs
            .pop_front()
            .unwrap_or_else(|| Ok(ProofReading::default()))
    }
}
