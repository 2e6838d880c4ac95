//! Integration tests for the settlement workflow state machine.

use std::sync::Arc;

use kwesta::api::SubmitOutcome;
use kwesta::domain::Denomination;
use kwesta::error::ApiError;
use kwesta::session::{keys, CredentialStore};
use kwesta::settlement::{FormInput, Phase, SettlementSession};
use kwesta::testkit::{logged_in_store, sample_volunteer_box, MemoryStore, ScriptedApi};
use rust_decimal_macros::dec;

fn session_with(api: Arc<ScriptedApi>, store: Arc<MemoryStore>) -> SettlementSession {
    SettlementSession::new(api, store)
}

#[tokio::test]
async fn test_happy_path_settlement() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    assert_eq!(session.open(7).await, &Phase::Ready);
    assert_eq!(session.volunteer().unwrap().headline(), "WOL-0007 - Jan Kowalski");
    // the logged-in user (id 4 in the sample roster) is pre-seeded
    assert_eq!(session.selected_counters().len(), 1);
    assert_eq!(session.selected_counters()[0].id, 4);

    session.edit(FormInput::Count(Denomination::Coin1Zl, "3".into()));
    session.edit(FormInput::Count(Denomination::Note10Zl, "2".into()));
    session.edit(FormInput::SelectCounter(9));
    assert_eq!(session.summary().grand_total, dec!(23.00));

    assert_eq!(session.submit().await, &Phase::Succeeded { settlement_id: 1 });

    let sent = api.last_submission.lock().unwrap().clone().unwrap();
    let json = serde_json::to_value(&sent).unwrap();
    assert_eq!(json["m1zl"], 3);
    assert_eq!(json["b10zl"], 2);
    assert_eq!(json["terminal"], 0);
    assert_eq!(json["liczacy"], "4,9");
    assert_eq!(json["sala"], "GŁÓWNA");
}

#[tokio::test]
async fn test_terminal_volunteer_flow() {
    let api = Arc::new(ScriptedApi::new().with_detail(Ok(sample_volunteer_box(7, true))));
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    session.open(7).await;
    session.edit(FormInput::Count(Denomination::Coin5Zl, "1".into()));
    session.edit(FormInput::TerminalAmount("15.50".into()));

    let summary = session.summary();
    assert!(summary.show_terminal);
    assert_eq!(summary.cash_total, dec!(5.00));
    assert_eq!(summary.terminal_total, dec!(15.50));
    assert_eq!(summary.grand_total, dec!(20.50));

    session.submit().await;
    let sent = api.last_submission.lock().unwrap().clone().unwrap();
    let json = serde_json::to_value(&sent).unwrap();
    assert_eq!(json["terminal"], 1);
    assert_eq!(json["kwotaZTerminala"], 15.5);
}

#[tokio::test]
async fn test_rejected_submit_keeps_form_state() {
    let api = Arc::new(ScriptedApi::new().with_submit(Ok(SubmitOutcome::Rejected {
        message: "Duplicate".into(),
    })));
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    session.open(7).await;
    session.edit(FormInput::Count(Denomination::Note100Zl, "4".into()));
    session.edit(FormInput::SelectCounter(9));

    assert_eq!(
        session.submit().await,
        &Phase::Failed {
            message: "Duplicate".into()
        }
    );
    // everything entered survives the failure for a retry
    assert_eq!(session.summary().cash_total, dec!(400));
    assert_eq!(session.selected_counters().len(), 2);

    *api.submit.lock().unwrap() = Ok(SubmitOutcome::Accepted { settlement_id: 12 });
    assert_eq!(session.submit().await, &Phase::Succeeded { settlement_id: 12 });
}

#[tokio::test]
async fn test_network_failure_surfaces_and_allows_retry() {
    let api = Arc::new(
        ScriptedApi::new().with_submit(Err(ApiError::Network("connection reset".into()))),
    );
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    session.open(7).await;
    let phase = session.submit().await.clone();
    match phase {
        Phase::Failed { message } => assert!(message.contains("connection reset")),
        other => panic!("expected Failed, got {other:?}"),
    }

    *api.submit.lock().unwrap() = Ok(SubmitOutcome::Accepted { settlement_id: 3 });
    assert_eq!(session.submit().await, &Phase::Succeeded { settlement_id: 3 });
    assert_eq!(api.calls.submit.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_submit_without_token_skips_network() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store.clone());

    session.open(7).await;
    store.remove(keys::AUTH_TOKEN);

    assert_eq!(session.submit().await, &Phase::Unauthenticated);
    assert_eq!(api.calls.submit.load(std::sync::atomic::Ordering::SeqCst), 0);
    // the remaining credential keys were cleared too
    assert!(store.get(keys::BASE_URL).is_none());
}

#[tokio::test]
async fn test_open_without_session_skips_network() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(MemoryStore::default());
    let mut session = session_with(api.clone(), store);

    assert_eq!(session.open(7).await, &Phase::Unauthenticated);
    assert_eq!(api.network_calls(), 0);
}

#[tokio::test]
async fn test_expired_token_forces_reauthentication() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    store.set(keys::TOKEN_EXPIRES_AT, "2020-01-01T00:00:00Z");
    let mut session = session_with(api.clone(), store.clone());

    assert_eq!(session.open(7).await, &Phase::Unauthenticated);
    assert_eq!(api.network_calls(), 0);
    assert!(store.get(keys::AUTH_TOKEN).is_none());
}

#[tokio::test]
async fn test_auth_rejection_during_load_clears_session() {
    let api = Arc::new(ScriptedApi::new().with_detail(Err(ApiError::AuthRejected)));
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api, store.clone());

    assert_eq!(session.open(7).await, &Phase::Unauthenticated);
    assert!(store.get(keys::AUTH_TOKEN).is_none());
}

#[tokio::test]
async fn test_load_failure_allows_reopening() {
    let api = Arc::new(ScriptedApi::new().with_detail(Err(ApiError::ServerRejected(500))));
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    let phase = session.open(7).await.clone();
    match phase {
        Phase::Failed { message } => assert!(message.contains("500")),
        other => panic!("expected Failed, got {other:?}"),
    }

    *api.detail.lock().unwrap() = Ok(sample_volunteer_box(7, false));
    assert_eq!(session.open(7).await, &Phase::Ready);
}

#[tokio::test]
async fn test_switching_volunteers_resets_form_state() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api.clone(), store);

    session.open(7).await;
    session.edit(FormInput::Count(Denomination::Note500Zl, "2".into()));
    session.edit(FormInput::SelectCounter(9));
    session.edit(FormInput::Room("backstage".into()));
    assert_eq!(session.summary().cash_total, dec!(1000));

    *api.detail.lock().unwrap() = Ok(sample_volunteer_box(9, false));
    assert_eq!(session.open(9).await, &Phase::Ready);

    // nothing from volunteer 7 leaks into volunteer 9's settlement
    assert_eq!(session.summary().cash_total, dec!(0));
    assert_eq!(session.selected_counters().len(), 1);
    assert_eq!(session.volunteer().unwrap().volunteer_id, 9);

    session.submit().await;
    let sent = api.last_submission.lock().unwrap().clone().unwrap();
    let json = serde_json::to_value(&sent).unwrap();
    assert_eq!(json["b500zl"], 0);
    assert_eq!(json["sala"], "GŁÓWNA");
}

#[tokio::test]
async fn test_abandon_discards_target() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api, store);

    session.open(7).await;
    session.edit(FormInput::Count(Denomination::Coin1Zl, "5".into()));
    session.abandon();

    assert_eq!(session.phase(), &Phase::Idle);
    assert!(session.volunteer().is_none());
    assert_eq!(session.summary().grand_total, dec!(0));
    // edits are rejected until a new target is opened
    assert!(!session.edit(FormInput::Count(Denomination::Coin1Zl, "5".into())));
}

#[tokio::test]
async fn test_edit_rejected_before_open() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api, store);

    assert!(!session.edit(FormInput::TerminalAmount("10".into())));
    assert_eq!(session.phase(), &Phase::Idle);
}

#[tokio::test]
async fn test_counter_search_excludes_selected() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(logged_in_store());
    let mut session = session_with(api, store);

    session.open(7).await;
    session.edit(FormInput::SelectCounter(9));

    let hits = session.filter_counters("");
    assert!(hits.iter().all(|p| p.id != 4 && p.id != 9));
    assert_eq!(session.filter_counters("nowak").len(), 0);
    assert_eq!(session.filter_counters("maria").len(), 1);
}
