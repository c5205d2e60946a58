//! # Inspector State
//!
//! The single context object owned by the application entry point:
//! registry, edit buffers, view mode, the displayed view-model and the
//! per-account in-flight guard.
//!
//! All methods are synchronous. Anything that needs the backend returns a
//! [`GatewayCall`]; the caller runs it (see
//! [`InspectorService`](crate::service::InspectorService)) and feeds the
//! resulting [`Completion`] back through [`InspectorState::apply`].

use super::account::AccountRegistry;
use super::edits::{PendingEdits, StorageEditBuffer};
use super::errors::{InspectorError, InspectorResult};
use super::hex::{Address, HexBlob};
use super::layout::{DisplayBox, TreeRenderer};
use super::view_mode::{ViewMode, ViewModeController};
use super::view_model::{TrieViewModel, ViewModelBuilder, NO_TRIE_TEXT};
use crate::config::InspectorConfig;
use shared_types::{ProofReading, TrieEnvelope, ValueReading};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

// =============================================================================
// CALLS AND COMPLETIONS
// =============================================================================

/// Issue order of refresh and commit calls within one session.
pub type CallSeq = u64;

/// Account whose trie a create or select call fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub account: Address,
    pub seq: CallSeq,
}

/// Snapshot of the edits a commit carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
    pub account: Address,
    pub edits: PendingEdits,
    pub seq: CallSeq,
}

/// Backend work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateAccount(RefreshTicket),
    SelectAccount(RefreshTicket),
    Commit(CommitTicket),
    ReadValue { account: Address, key: HexBlob },
    ReadProof { account: Address, key: HexBlob, root: String },
}

impl GatewayCall {
    pub fn account(&self) -> &Address {
        match self {
            GatewayCall::CreateAccount(ticket) | GatewayCall::SelectAccount(ticket) => {
                &ticket.account
            }
            GatewayCall::Commit(ticket) => &ticket.account,
            GatewayCall::ReadValue { account, .. } | GatewayCall::ReadProof { account, .. } => {
                account
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GatewayCall::CreateAccount(_) => "create_account",
            GatewayCall::SelectAccount(_) => "select_account",
            GatewayCall::Commit(_) => "commit",
            GatewayCall::ReadValue { .. } => "read_value",
            GatewayCall::ReadProof { .. } => "read_proof",
        }
    }
}

/// Outcome of a [`GatewayCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Refresh {
        ticket: RefreshTicket,
        result: InspectorResult<TrieEnvelope>,
    },
    Commit {
        ticket: CommitTicket,
        result: InspectorResult<TrieEnvelope>,
    },
    Value {
        account: Address,
        key: HexBlob,
        result: InspectorResult<ValueReading>,
    },
    Proof {
        account: Address,
        key: HexBlob,
        root: String,
        result: InspectorResult<ProofReading>,
    },
}

/// Latest successful read, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    Value {
        account: Address,
        key: HexBlob,
        reading: ValueReading,
    },
    Proof {
        account: Address,
        key: HexBlob,
        root: String,
        reading: ProofReading,
    },
}

// =============================================================================
// DISPLAYED TRIE
// =============================================================================

/// View-model of the selected account with both projections built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedTrie {
    pub account: Address,
    pub model: TrieViewModel,
    /// Tree projection, absent when the view-model has no tree.
    pub layout: Option<DisplayBox>,
}

impl DisplayedTrie {
    pub fn new(account: Address, model: TrieViewModel) -> Self {
        let layout = model.tree.as_ref().map(|tree| {
            TreeRenderer::new(model.correlator()).render(tree, model.known_root_hash())
        });
        Self {
            account,
            model,
            layout,
        }
    }
}

/// What the active view should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection<'a> {
    /// No account selected.
    Idle,
    /// Selection changed and the refresh has not resolved yet.
    Loading,
    Text(&'a str),
    Tree(&'a DisplayBox),
    /// Tree mode without a tree; carries the placeholder text.
    NoTree(&'a str),
}

// =============================================================================
// STATE
// =============================================================================

/// Session state of the inspector.
#[derive(Debug, Default)]
pub struct InspectorState {
    registry: AccountRegistry,
    edits: StorageEditBuffer,
    view_mode: ViewModeController,
    builder: ViewModelBuilder,
    displayed: Option<DisplayedTrie>,
    in_flight: HashSet<Address>,
    /// Per account, refreshes issued before this call are outdated.
    fresh_from: HashMap<Address, CallSeq>,
    next_seq: CallSeq,
    last_reading: Option<Reading>,
    last_error: Option<String>,
}

impl InspectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &InspectorConfig) -> Self {
        Self {
            builder: ViewModelBuilder::new(config.max_trie_depth),
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Register and select an address.
    ///
    /// A new address asks the backend to create it; a known one is simply
    /// reselected.
    pub fn register(&mut self, input: &str) -> InspectorResult<GatewayCall> {
        let known = Address::parse(input)
            .map(|a| self.registry.contains(&a))
            .unwrap_or(false);
        let registered = self.registry.register(input);
        let address = self.record(registered)?;
        let ticket = self.begin_refresh(&address);

        if known {
            Ok(GatewayCall::SelectAccount(ticket))
        } else {
            info!(address = %address, "Account registered");
            Ok(GatewayCall::CreateAccount(ticket))
        }
    }

    /// Select a registered account and request a refresh of its trie.
    ///
    /// Allowed while another account's commit is in flight.
    pub fn select(&mut self, address: &Address) -> InspectorResult<GatewayCall> {
        let result = self.registry.select(address);
        self.record(result)?;
        let ticket = self.begin_refresh(address);
        Ok(GatewayCall::SelectAccount(ticket))
    }

    pub fn select_index(&mut self, index: usize) -> InspectorResult<GatewayCall> {
        let address = self
            .registry
            .list()
            .get(index)
            .cloned()
            .ok_or(InspectorError::NoAccountSelected)?;
        self.select(&address)
    }

    fn begin_refresh(&mut self, address: &Address) -> RefreshTicket {
        let seq = self.issue_seq();
        // An earlier refresh still in flight is superseded by this one.
        self.fresh_from.insert(address.clone(), seq);
        debug!(address = %address, seq, "Refresh requested");
        self.displayed = None;
        RefreshTicket {
            account: address.clone(),
            seq,
        }
    }

    fn issue_seq(&mut self) -> CallSeq {
        self.next_seq += 1;
        self.next_seq
    }

    /// Whether a refresh issued at `seq` predates a newer refresh or a
    /// confirmed commit for the same account.
    fn is_outdated(&self, account: &Address, seq: CallSeq) -> bool {
        self.fresh_from
            .get(account)
            .is_some_and(|&fresh| seq < fresh)
    }

    /// Mark everything issued before `seq` for `account` as outdated.
    fn advance_fresh(&mut self, account: &Address, seq: CallSeq) {
        let fresh = self.fresh_from.entry(account.clone()).or_insert(seq);
        *fresh = (*fresh).max(seq);
    }

    pub fn accounts(&self) -> &[Address] {
        self.registry.list()
    }

    pub fn selected(&self) -> Option<&Address> {
        self.registry.selected()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.registry.selected_index()
    }

    fn require_selected(&self) -> InspectorResult<Address> {
        self.selected()
            .cloned()
            .ok_or(InspectorError::NoAccountSelected)
    }

    fn require_known(&self, account: &Address) -> InspectorResult<()> {
        if self.registry.contains(account) {
            Ok(())
        } else {
            Err(InspectorError::UnknownAccount(account.to_string()))
        }
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    pub fn stage(&mut self, account: &Address, key: &str, value: &str) -> InspectorResult<()> {
        let result = self
            .require_known(account)
            .and_then(|()| self.edits.stage(account, key, value));
        self.record(result)
    }

    pub fn stage_selected(&mut self, key: &str, value: &str) -> InspectorResult<()> {
        let selected = self.require_selected();
        let account = self.record(selected)?;
        self.stage(&account, key, value)
    }

    pub fn unstage(&mut self, account: &Address, key: &str) -> bool {
        self.edits.unstage(account, key)
    }

    pub fn pending(&self, account: &Address) -> PendingEdits {
        self.edits.pending(account)
    }

    pub fn pending_count(&self, account: &Address) -> usize {
        self.edits.pending_count(account)
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Start a commit of the account's pending edits.
    ///
    /// Fails with `Busy`, without any call, while another commit for the
    /// same account is outstanding. The buffer is left intact until the
    /// completion reports success.
    pub fn begin_commit(&mut self, account: &Address) -> InspectorResult<GatewayCall> {
        let result = self.check_commit(account);
        self.record(result)?;

        let ticket = CommitTicket {
            account: account.clone(),
            edits: self.edits.commit_snapshot(account),
            seq: self.issue_seq(),
        };
        self.in_flight.insert(account.clone());
        info!(address = %account, keys = ticket.edits.len(), "Commit issued");
        Ok(GatewayCall::Commit(ticket))
    }

    pub fn begin_commit_selected(&mut self) -> InspectorResult<GatewayCall> {
        let selected = self.require_selected();
        let account = self.record(selected)?;
        self.begin_commit(&account)
    }

    fn check_commit(&self, account: &Address) -> InspectorResult<()> {
        self.require_known(account)?;
        if self.in_flight.contains(account) {
            warn!(address = %account, "Commit rejected: already in flight");
            return Err(InspectorError::Busy(account.to_string()));
        }
        if !self.edits.has_pending(account) {
            return Err(InspectorError::NothingStaged(account.to_string()));
        }
        Ok(())
    }

    pub fn is_in_flight(&self, account: &Address) -> bool {
        self.in_flight.contains(account)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn begin_value_read(&mut self, account: &Address, key: &str) -> InspectorResult<GatewayCall> {
        let result = self
            .require_known(account)
            .and_then(|()| HexBlob::parse("key", key));
        let key = self.record(result)?;
        Ok(GatewayCall::ReadValue {
            account: account.clone(),
            key,
        })
    }

    /// Proof read against the root hash currently displayed for `account`.
    pub fn begin_proof_read(&mut self, account: &Address, key: &str) -> InspectorResult<GatewayCall> {
        let result = self
            .require_known(account)
            .and_then(|()| HexBlob::parse("key", key))
            .and_then(|key| {
                let root = self
                    .displayed
                    .as_ref()
                    .filter(|d| &d.account == account)
                    .and_then(|d| d.model.known_root_hash())
                    .ok_or_else(|| InspectorError::NoRootHash(account.to_string()))?;
                Ok((key, root.to_string()))
            });
        let (key, root) = self.record(result)?;
        Ok(GatewayCall::ReadProof {
            account: account.clone(),
            key,
            root,
        })
    }

    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Apply the outcome of a gateway call.
    ///
    /// Returns the call's own error, if any. A decode failure of an
    /// otherwise successful reply degrades the view and is only recorded.
    pub fn apply(&mut self, completion: Completion) -> InspectorResult<()> {
        match completion {
            Completion::Refresh { ticket, result } => {
                if !self.registry.is_selected(&ticket.account) {
                    debug!(address = %ticket.account, "Dropping stale refresh");
                    return result.map(|_| ());
                }
                if self.is_outdated(&ticket.account, ticket.seq) {
                    debug!(address = %ticket.account, seq = ticket.seq, "Dropping outdated refresh");
                    return result.map(|_| ());
                }
                let envelope = self.record(result)?;
                self.install(ticket.account, &envelope);
                Ok(())
            }
            Completion::Commit { ticket, result } => {
                self.in_flight.remove(&ticket.account);
                let envelope = match result {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        warn!(address = %ticket.account, error = %err, "Commit failed; edits kept");
                        return self.record(Err(err));
                    }
                };
                self.edits.confirm_committed(&ticket.account, &ticket.edits);
                self.advance_fresh(&ticket.account, ticket.seq);
                info!(address = %ticket.account, keys = ticket.edits.len(), "Commit confirmed");
                if self.registry.is_selected(&ticket.account) {
                    self.install(ticket.account, &envelope);
                } else {
                    self.last_error = None;
                }
                Ok(())
            }
            Completion::Value {
                account,
                key,
                result,
            } => {
                let reading = self.record(result)?;
                self.last_reading = Some(Reading::Value {
                    account,
                    key,
                    reading,
                });
                self.last_error = None;
                Ok(())
            }
            Completion::Proof {
                account,
                key,
                root,
                result,
            } => {
                let reading = self.record(result)?;
                self.last_reading = Some(Reading::Proof {
                    account,
                    key,
                    root,
                    reading,
                });
                self.last_error = None;
                Ok(())
            }
        }
    }

    fn install(&mut self, account: Address, envelope: &TrieEnvelope) {
        let outcome = self.builder.build_envelope(envelope);
        self.last_error = outcome.degraded.map(|err| err.to_string());
        self.displayed = Some(DisplayedTrie::new(account, outcome.view_model));
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    pub fn displayed(&self) -> Option<&DisplayedTrie> {
        self.displayed.as_ref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode.active()
    }

    pub fn switch_view(&mut self, mode: ViewMode) -> bool {
        self.view_mode.switch_to(mode)
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view_mode.toggle()
    }

    /// The active projection of the displayed view-model.
    pub fn projection(&self) -> Projection<'_> {
        let Some(displayed) = &self.displayed else {
            return if self.selected().is_some() {
                Projection::Loading
            } else {
                Projection::Idle
            };
        };
        match (self.view_mode.active(), &displayed.layout) {
            (ViewMode::Text, _) => Projection::Text(&displayed.model.text),
            (ViewMode::Tree, Some(layout)) => Projection::Tree(layout),
            (ViewMode::Tree, None) => Projection::NoTree(NO_TRIE_TEXT),
        }
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Keep the message of a failed result for display.
    fn record<T>(&mut self, result: InspectorResult<T>) -> InspectorResult<T> {
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::TriePayload;

    fn envelope(root: &str, value: &str) -> TrieEnvelope {
        TrieEnvelope {
            trie: Some(TriePayload {
                root_hash: Some(root.to_string()),
                trie_data: Some(json!({"type": "shortNode_value", "isLeaf": true, "key": "0a", "value": value})),
                ..TriePayload::default()
            }),
            ..TrieEnvelope::default()
        }
    }

    fn registered(state: &mut InspectorState, input: &str) -> Address {
        match state.register(input).unwrap() {
            GatewayCall::CreateAccount(t) | GatewayCall::SelectAccount(t) => t.account,
            other => panic!("unexpected call {other:?}"),
        }
    }

    /// Ticket of the most recent refresh issued for `account`.
    fn refreshed(state: &InspectorState, account: &Address) -> RefreshTicket {
        RefreshTicket {
            account: account.clone(),
            seq: state.fresh_from.get(account).copied().unwrap_or_default(),
        }
    }

    #[test]
    fn test_register_new_then_known() {
        let mut state = InspectorState::new();
        assert!(matches!(state.register("0xab"), Ok(GatewayCall::CreateAccount(_))));
        assert!(matches!(state.register("0xAB"), Ok(GatewayCall::SelectAccount(_))));
        assert_eq!(state.accounts().len(), 1);
    }

    #[test]
    fn test_invalid_register_records_error() {
        let mut state = InspectorState::new();
        assert!(state.register("nope").is_err());
        assert!(state.last_error().unwrap().contains("Invalid address"));
        assert!(state.accounts().is_empty());
        assert_eq!(state.projection(), Projection::Idle);
    }

    #[test]
    fn test_select_clears_view_until_refresh() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(envelope("0x01", "02")),
            })
            .unwrap();
        assert!(state.displayed().is_some());

        let call = state.select(&a).unwrap();
        assert_eq!(call, GatewayCall::SelectAccount(a.clone()));
        assert_eq!(state.projection(), Projection::Loading);
    }

    #[test]
    fn test_select_unknown() {
        let mut state = InspectorState::new();
        let stranger = Address::parse("0x99").unwrap();
        assert_eq!(
            state.select(&stranger),
            Err(InspectorError::UnknownAccount(stranger.to_string()))
        );
    }

    #[test]
    fn test_stale_refresh_is_dropped() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        let b = registered(&mut state, "0x0b");

        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(envelope("0x01", "02")),
            })
            .unwrap();
        assert!(state.displayed().is_none());

        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &b),
                result: Ok(envelope("0x02", "03")),
            })
            .unwrap();
        assert_eq!(state.displayed().unwrap().account, b);
    }

    #[test]
    fn test_refresh_issued_before_commit_is_dropped_after_it() {
        let mut state = InspectorState::new();
        let GatewayCall::CreateAccount(early) = state.register("0x0a").unwrap() else {
            panic!("expected create call");
        };
        let a = early.account.clone();
        state.stage(&a, "0x01", "0x02").unwrap();
        let GatewayCall::Commit(ticket) = state.begin_commit(&a).unwrap() else {
            panic!("expected commit call");
        };
        assert!(ticket.seq > early.seq);

        state
            .apply(Completion::Commit {
                ticket,
                result: Ok(envelope("0xnew", "02")),
            })
            .unwrap();
        state
            .apply(Completion::Refresh {
                ticket: early,
                result: Ok(envelope("0xold", "00")),
            })
            .unwrap();

        assert_eq!(state.displayed().unwrap().model.root_hash, "0xnew");
        assert_eq!(state.pending_count(&a), 0);
    }

    #[test]
    fn test_superseded_refresh_is_dropped() {
        let mut state = InspectorState::new();
        let GatewayCall::CreateAccount(first) = state.register("0x0a").unwrap() else {
            panic!("expected create call");
        };
        let GatewayCall::SelectAccount(second) = state.select(&first.account).unwrap() else {
            panic!("expected select call");
        };

        state
            .apply(Completion::Refresh {
                ticket: second,
                result: Ok(envelope("0x02", "02")),
            })
            .unwrap();
        let err = InspectorError::BackendUnavailable("late".into());
        assert_eq!(
            state.apply(Completion::Refresh {
                ticket: first,
                result: Err(err.clone()),
            }),
            Err(err)
        );

        assert_eq!(state.displayed().unwrap().model.root_hash, "0x02");
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_second_commit_is_busy() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        state.stage(&a, "0x01", "0x02").unwrap();

        assert!(state.begin_commit(&a).is_ok());
        assert_eq!(
            state.begin_commit(&a),
            Err(InspectorError::Busy(a.to_string()))
        );
        assert!(state.is_in_flight(&a));
    }

    #[test]
    fn test_commit_requires_edits() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        assert_eq!(
            state.begin_commit(&a),
            Err(InspectorError::NothingStaged(a.to_string()))
        );
        assert!(!state.is_in_flight(&a));
    }

    #[test]
    fn test_commit_failure_keeps_edits_and_view() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(envelope("0x01", "02")),
            })
            .unwrap();
        let before = state.displayed().cloned();
        state.stage(&a, "0x01", "0x02").unwrap();

        let GatewayCall::Commit(ticket) = state.begin_commit(&a).unwrap() else {
            panic!("expected commit call");
        };
        let err = InspectorError::BackendUnavailable("disk full".into());
        assert_eq!(
            state.apply(Completion::Commit {
                ticket,
                result: Err(err.clone())
            }),
            Err(err)
        );

        assert_eq!(state.pending_count(&a), 1);
        assert_eq!(state.displayed().cloned(), before);
        assert_eq!(state.last_error(), Some("disk full"));
        assert!(!state.is_in_flight(&a));
    }

    #[test]
    fn test_commit_for_unselected_account_keeps_current_view() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        state.stage(&a, "0x01", "0x02").unwrap();
        let GatewayCall::Commit(ticket) = state.begin_commit(&a).unwrap() else {
            panic!("expected commit call");
        };

        let b = registered(&mut state, "0x0b");
        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &b),
                result: Ok(envelope("0xbb", "0b")),
            })
            .unwrap();
        state
            .apply(Completion::Commit {
                ticket,
                result: Ok(envelope("0xaa", "0a")),
            })
            .unwrap();

        assert_eq!(state.pending_count(&a), 0);
        assert_eq!(state.displayed().unwrap().account, b);
        assert_eq!(state.displayed().unwrap().model.root_hash, "0xbb");
    }

    #[test]
    fn test_malformed_reply_degrades_with_error() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        let mut bad = envelope("0x01", "02");
        if let Some(trie) = bad.trie.as_mut() {
            trie.trie_data = Some(json!("{oops"));
        }

        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(bad),
            })
            .unwrap();
        assert_eq!(state.projection(), Projection::Text(NO_TRIE_TEXT));
        assert!(state.last_error().unwrap().starts_with("Malformed trie data"));
    }

    #[test]
    fn test_projection_follows_view_mode() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(envelope("0x01", "02")),
            })
            .unwrap();

        assert!(matches!(state.projection(), Projection::Text(t) if t.contains("Short Node")));
        state.switch_view(ViewMode::Tree);
        assert!(matches!(state.projection(), Projection::Tree(b) if b.title == "ROOT LEAF NODE"));
    }

    #[test]
    fn test_proof_needs_root_hash() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        assert_eq!(
            state.begin_proof_read(&a, "0x01"),
            Err(InspectorError::NoRootHash(a.to_string()))
        );

        state
            .apply(Completion::Refresh {
                ticket: refreshed(&state, &a),
                result: Ok(envelope("0x77", "02")),
            })
            .unwrap();
        assert_eq!(
            state.begin_proof_read(&a, "0x01").unwrap(),
            GatewayCall::ReadProof {
                account: a,
                key: HexBlob::parse("key", "0x01").unwrap(),
                root: "0x77".into()
            }
        );
    }

    #[test]
    fn test_value_read_validates_key() {
        let mut state = InspectorState::new();
        let a = registered(&mut state, "0x0a");
        assert!(matches!(
            state.begin_value_read(&a, "zz"),
            Err(InspectorError::InvalidHex { .. })
        ));
    }
}
