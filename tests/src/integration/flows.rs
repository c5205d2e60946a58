//! # Inspector Flows
//!
//! Register, stage and commit through the service against a scripted
//! backend.
//!
//! ## Flows Tested:
//!
//! 1. **Commit success**: buffer emptied, view-model replaced by the reply
//! 2. **Commit failure**: buffer and prior view-model both retained
//! 3. **Isolation**: committing one account never touches another's edits
//! 4. **In-flight guard**: a second commit is `Busy` and sends nothing
//! 5. **Stale completions**: a late commit does not replace a newer selection,
//!    and a late refresh does not replace a confirmed commit

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use shared_types::{OriginalKvPair, ProofReading, ValueReading};
    use ti_core::{
        Address, Completion, GatewayCall, GatewayError, InspectorError, InspectorService,
        InspectorState, Operation, Projection, Reading, TrieNode, ViewMode, NO_TRIE_TEXT,
    };

    use crate::integration::fixtures::{branch, envelope, envelope_with_pairs, leaf};
    use crate::integration::{Request, ScriptedGateway};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn setup() -> (Arc<ScriptedGateway>, InspectorService<ScriptedGateway>, InspectorState) {
        setup_with_timeout(Duration::from_secs(5))
    }

    fn setup_with_timeout(
        timeout: Duration,
    ) -> (Arc<ScriptedGateway>, InspectorService<ScriptedGateway>, InspectorState) {
        let gateway = Arc::new(ScriptedGateway::new());
        let service = InspectorService::with_timeout(Arc::clone(&gateway), timeout);
        (gateway, service, InspectorState::new())
    }

    fn pending_pairs(state: &InspectorState, account: &Address) -> Vec<(String, String)> {
        state
            .pending(account)
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    // =============================================================================
    // COMMIT OUTCOMES
    // =============================================================================

    #[tokio::test]
    async fn test_register_stage_commit_success() {
        let (gateway, service, mut state) = setup();

        let account = service.register(&mut state, "0xAB").await.unwrap();
        assert_eq!(account.as_str(), format!("0x{}ab", "0".repeat(38)));
        assert_eq!(state.displayed().unwrap().model.root_hash, "-");

        state.stage(&account, "0x01", "0x02").unwrap();
        gateway.reply(Operation::CommitTrie, Ok(envelope("0xr1", leaf("01", "02"))));
        service.commit(&mut state, &account).await.unwrap();

        assert!(state.pending(&account).is_empty());
        let model = &state.displayed().unwrap().model;
        assert_eq!(model.root_hash, "0xr1");
        match model.tree.as_ref().unwrap() {
            TrieNode::Leaf(l) => assert_eq!(l.value, "02"),
            other => panic!("unexpected root {other:?}"),
        }

        let update = gateway
            .requests()
            .into_iter()
            .find(|r| r.operation() == Operation::UpdateStorage)
            .unwrap();
        match update {
            Request::UpdateStorage { address, storage } => {
                assert_eq!(address, account);
                assert_eq!(storage.len(), 1);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commit_failure_retains_edits_and_view() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0xAB").await.unwrap();

        state.stage(&account, "0x05", "0x06").unwrap();
        gateway.reply(Operation::CommitTrie, Ok(envelope("0xr1", leaf("05", "06"))));
        service.commit(&mut state, &account).await.unwrap();
        let prior = state.displayed().cloned().unwrap();

        state.stage(&account, "0x01", "0x02").unwrap();
        gateway.reply(
            Operation::UpdateStorage,
            Err(GatewayError::Backend("Invalid key format: odd length".into())),
        );
        let err = service.commit(&mut state, &account).await.unwrap_err();

        assert_eq!(
            err,
            InspectorError::BackendUnavailable("Invalid key format: odd length".into())
        );
        assert_eq!(pending_pairs(&state, &account), vec![pair("0x01", "0x02")]);
        assert_eq!(state.displayed(), Some(&prior));
        assert_eq!(state.last_error(), Some("Invalid key format: odd length"));
        assert_eq!(gateway.count(Operation::CommitTrie), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_call_after_update_keeps_edits() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();
        state.stage(&account, "0x01", "0x02").unwrap();

        gateway.reply(
            Operation::CommitTrie,
            Err(GatewayError::Status {
                status: 503,
                message: "unavailable".into(),
            }),
        );
        assert!(service.commit(&mut state, &account).await.is_err());
        assert_eq!(pending_pairs(&state, &account), vec![pair("0x01", "0x02")]);

        // Retry resends the same writes
        service.commit(&mut state, &account).await.unwrap();
        assert!(state.pending(&account).is_empty());
        assert_eq!(gateway.count(Operation::UpdateStorage), 2);
    }

    #[tokio::test]
    async fn test_commit_is_isolated_per_account() {
        let (gateway, service, mut state) = setup();
        let a = service.register(&mut state, "0x0a").await.unwrap();
        let b = service.register(&mut state, "0x0b").await.unwrap();

        state.stage(&a, "0x01", "0x02").unwrap();
        state.stage(&b, "0x01", "0x03").unwrap();
        state.stage(&b, "0x04", "0x05").unwrap();

        service.commit(&mut state, &a).await.unwrap();

        assert!(state.pending(&a).is_empty());
        assert_eq!(
            pending_pairs(&state, &b),
            vec![pair("0x01", "0x03"), pair("0x04", "0x05")]
        );

        let updates: Vec<_> = gateway
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::UpdateStorage { address, storage } => Some((address, storage.len())),
                _ => None,
            })
            .collect();
        assert_eq!(updates, vec![(a, 1)]);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_backend() {
        let (gateway, service, mut state) = setup();
        assert!(matches!(
            service.register(&mut state, "0xZZ").await,
            Err(InspectorError::InvalidAddress { .. })
        ));
        let account = service.register(&mut state, "0x0a").await.unwrap();

        assert!(matches!(
            state.stage(&account, "01", "0x02"),
            Err(InspectorError::InvalidHex { field: "key", .. })
        ));
        assert_eq!(
            service.commit(&mut state, &account).await,
            Err(InspectorError::NothingStaged(account.to_string()))
        );
        assert_eq!(gateway.requests(), vec![Request::CreateAccount(account)]);
    }

    // =============================================================================
    // IN-FLIGHT GUARD AND TIMEOUTS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_second_commit_is_busy() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();
        state.stage(&account, "0x01", "0x02").unwrap();
        gateway.delay(Operation::UpdateStorage, Duration::from_millis(200));

        let (tx, mut rx) = mpsc::unbounded_channel();
        service.spawn(state.begin_commit(&account).unwrap(), tx);

        assert_eq!(
            state.begin_commit(&account),
            Err(InspectorError::Busy(account.to_string()))
        );

        state.apply(rx.recv().await.unwrap()).unwrap();
        assert_eq!(gateway.count(Operation::UpdateStorage), 1);
        assert!(state.begin_commit(&account).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_edits() {
        let (gateway, service, mut state) = setup_with_timeout(Duration::from_millis(250));
        let account = service.register(&mut state, "0x0a").await.unwrap();
        state.stage(&account, "0x01", "0x02").unwrap();
        gateway.delay(Operation::CommitTrie, Duration::from_secs(30));

        let err = service.commit(&mut state, &account).await.unwrap_err();

        assert_eq!(
            err,
            InspectorError::BackendUnavailable("Backend did not respond within 250ms".into())
        );
        assert_eq!(pending_pairs(&state, &account), vec![pair("0x01", "0x02")]);
        assert!(!state.is_in_flight(&account));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_commit_does_not_replace_newer_selection() {
        let (gateway, service, mut state) = setup();
        let a = service.register(&mut state, "0x0a").await.unwrap();
        let b = service.register(&mut state, "0x0b").await.unwrap();
        service.select(&mut state, &a).await.unwrap();

        state.stage(&a, "0x01", "0x02").unwrap();
        gateway.delay(Operation::CommitTrie, Duration::from_millis(500));
        gateway.reply(Operation::CommitTrie, Ok(envelope("0xaa", leaf("01", "02"))));
        gateway.reply(Operation::SelectAccount, Ok(envelope("0xbb", leaf("09", "09"))));

        let (tx, mut rx) = mpsc::unbounded_channel();
        service.spawn(state.begin_commit(&a).unwrap(), tx);

        // Switching accounts mid-commit is allowed
        service.select(&mut state, &b).await.unwrap();
        assert_eq!(state.displayed().unwrap().model.root_hash, "0xbb");

        state.apply(rx.recv().await.unwrap()).unwrap();
        assert_eq!(state.displayed().unwrap().account, b);
        assert_eq!(state.displayed().unwrap().model.root_hash, "0xbb");
        assert!(state.pending(&a).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_refresh_does_not_replace_committed_trie() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();

        gateway.delay(Operation::SelectAccount, Duration::from_millis(500));
        gateway.reply(Operation::SelectAccount, Ok(envelope("0xold", leaf("09", "09"))));
        gateway.reply(Operation::CommitTrie, Ok(envelope("0xnew", leaf("01", "02"))));

        let (tx, mut rx) = mpsc::unbounded_channel();
        service.spawn(state.select(&account).unwrap(), tx);

        state.stage(&account, "0x01", "0x02").unwrap();
        service.commit(&mut state, &account).await.unwrap();
        assert_eq!(state.displayed().unwrap().model.root_hash, "0xnew");

        // The select was answered after the commit it predates
        state.apply(rx.recv().await.unwrap()).unwrap();
        assert_eq!(state.displayed().unwrap().model.root_hash, "0xnew");
        assert!(state.pending(&account).is_empty());
        assert_eq!(state.last_error(), None);
        assert_eq!(gateway.count(Operation::SelectAccount), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_staged_during_commit_survive() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();
        state.stage(&account, "0x01", "0x02").unwrap();
        state.stage(&account, "0x03", "0x04").unwrap();
        gateway.delay(Operation::UpdateStorage, Duration::from_millis(100));

        let (tx, mut rx) = mpsc::unbounded_channel();
        service.spawn(state.begin_commit(&account).unwrap(), tx);

        state.stage(&account, "0x03", "0x99").unwrap();
        state.stage(&account, "0x05", "0x06").unwrap();
        state.apply(rx.recv().await.unwrap()).unwrap();

        assert_eq!(
            pending_pairs(&state, &account),
            vec![pair("0x03", "0x99"), pair("0x05", "0x06")]
        );
    }

    // =============================================================================
    // VIEW-MODEL
    // =============================================================================

    #[tokio::test]
    async fn test_malformed_trie_degrades_view() {
        let (gateway, service, mut state) = setup();
        gateway.reply(
            Operation::CreateAccount,
            Ok(envelope("0xr1", serde_json::json!("{not json"))),
        );

        let account = service.register(&mut state, "0x0a").await.unwrap();

        let displayed = state.displayed().unwrap();
        assert_eq!(displayed.account, account);
        assert_eq!(displayed.model.root_hash, "0xr1");
        assert_eq!(state.projection(), Projection::Text(NO_TRIE_TEXT));
        assert!(state.last_error().unwrap().starts_with("Malformed trie data"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_view() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();
        gateway.reply(
            Operation::SelectAccount,
            Err(GatewayError::Backend("Account not found".into())),
        );

        assert!(service.select(&mut state, &account).await.is_err());
        assert!(state.displayed().is_none());
        assert_eq!(state.projection(), Projection::Loading);
        assert_eq!(state.last_error(), Some("Account not found"));
    }

    #[tokio::test]
    async fn test_branch_layout_is_ordered_and_stable() {
        let (gateway, service, mut state) = setup();
        let trie = branch(&[(15, leaf("f1", "0x03")), (0, leaf("01", "0x02"))]);
        let pairs = vec![OriginalKvPair {
            original_key: "0x01".into(),
            original_value: "0x00aa".into(),
            key_hex: "01".into(),
            value_hex: "0x02".into(),
        }];
        gateway.reply(
            Operation::CreateAccount,
            Ok(envelope_with_pairs("0xr1", trie.clone(), pairs.clone())),
        );
        gateway.reply(
            Operation::SelectAccount,
            Ok(envelope_with_pairs("0xr1", trie, pairs)),
        );

        let account = service.register(&mut state, "0x0a").await.unwrap();
        state.switch_view(ViewMode::Tree);
        let first = match state.projection() {
            Projection::Tree(layout) => layout.to_string(),
            other => panic!("unexpected projection {other:?}"),
        };

        let slot_0 = first.find("(Slot 0)").unwrap();
        let slot_f = first.find("(Slot F)").unwrap();
        assert!(slot_0 < slot_f);
        assert!(first.contains("Original Value: 0xaa"));

        service.select(&mut state, &account).await.unwrap();
        let second = match state.projection() {
            Projection::Tree(layout) => layout.to_string(),
            other => panic!("unexpected projection {other:?}"),
        };
        assert_eq!(first, second);
    }

    // =============================================================================
    // READS
    // =============================================================================

    #[tokio::test]
    async fn test_proof_read_uses_displayed_root() {
        let (gateway, service, mut state) = setup();
        gateway.reply(
            Operation::CreateAccount,
            Ok(envelope("0xr1", leaf("01", "02"))),
        );
        let account = service.register(&mut state, "0x0a").await.unwrap();

        gateway.reply_proof(Ok(ProofReading {
            root_hash: Some("0xr1".into()),
            value: "02".into(),
        }));
        service.read_proof(&mut state, &account, "0x01").await.unwrap();

        assert!(gateway.requests().contains(&Request::ReadProof {
            address: account.clone(),
            key: ti_core::HexBlob::parse("key", "0x01").unwrap(),
            root: "0xr1".into(),
        }));
        assert!(matches!(state.last_reading(), Some(Reading::Proof { reading, .. }) if reading.value == "02"));
    }

    #[tokio::test]
    async fn test_value_read_keeps_last_reading() {
        let (gateway, service, mut state) = setup();
        let account = service.register(&mut state, "0x0a").await.unwrap();

        gateway.reply_value(Ok(ValueReading {
            value: "2".into(),
            original_match: true,
            ..ValueReading::default()
        }));
        service.read_value(&mut state, &account, "0x01").await.unwrap();

        match state.last_reading() {
            Some(Reading::Value { reading, key, .. }) => {
                assert_eq!(reading.value, "2");
                assert!(reading.original_match);
                assert_eq!(key.as_str(), "0x01");
            }
            other => panic!("unexpected reading {other:?}"),
        }

        let call = state.begin_value_read(&account, "0x02").unwrap();
        assert!(matches!(call, GatewayCall::ReadValue { .. }));
        gateway.reply_value(Err(GatewayError::Backend("Account not found".into())));
        let completion = service.execute(call).await;
        assert!(matches!(completion, Completion::Value { result: Err(_), .. }));
        assert!(state.apply(completion).is_err());
        assert!(matches!(state.last_reading(), Some(Reading::Value { .. })));
    }
}
