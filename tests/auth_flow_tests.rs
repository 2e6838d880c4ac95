//! Integration tests for login/logout and the credential lifecycle.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use kwesta::auth::Authenticator;
use kwesta::qr::LoginHint;
use kwesta::session::{keys, CredentialStore, Session};
use kwesta::testkit::{logged_in_store, MemoryStore, ScriptedApi};

#[tokio::test]
async fn test_login_persists_session() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(MemoryStore::default());
    let auth = Authenticator::new(api, store.clone());

    auth.login("https://sztab.example.org/", " anna ", "secret")
        .await
        .unwrap();

    // trailing slash trimmed, username trimmed, token stored
    assert_eq!(
        store.get(keys::BASE_URL).as_deref(),
        Some("https://sztab.example.org")
    );
    assert_eq!(store.get(keys::USERNAME).as_deref(), Some("anna"));
    assert_eq!(store.get(keys::AUTH_TOKEN).as_deref(), Some("scripted-token"));
    assert!(store.get(keys::TOKEN_EXPIRES_AT).is_some());

    let session = Session::load(store.as_ref()).unwrap();
    assert!(!session.is_expired(chrono::Utc::now()));
}

#[tokio::test]
async fn test_login_rejects_blank_fields() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(MemoryStore::default());
    let auth = Authenticator::new(api, store.clone());

    assert!(auth.login("", "anna", "secret").await.is_err());
    assert!(auth.login("https://x", "  ", "secret").await.is_err());
    assert!(auth.login("https://x", "anna", "").await.is_err());
    assert!(store.get(keys::AUTH_TOKEN).is_none());
}

#[tokio::test]
async fn test_login_rejects_invalid_url() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(MemoryStore::default());
    let auth = Authenticator::new(api, store);

    assert!(auth.login("not a url", "anna", "secret").await.is_err());
}

#[tokio::test]
async fn test_logout_clears_store_even_when_server_fails() {
    let api = Arc::new(ScriptedApi::new());
    api.fail_logout.store(true, Ordering::SeqCst);
    let store = Arc::new(logged_in_store());
    let auth = Authenticator::new(api.clone(), store.clone());

    auth.logout().await;

    assert_eq!(api.calls.logout.load(Ordering::SeqCst), 1);
    assert!(store.get(keys::AUTH_TOKEN).is_none());
    assert!(store.get(keys::USERNAME).is_none());
}

#[tokio::test]
async fn test_logout_without_session_skips_server() {
    let api = Arc::new(ScriptedApi::new());
    let store = Arc::new(MemoryStore::default());
    let auth = Authenticator::new(api.clone(), store);

    auth.logout().await;
    assert_eq!(api.calls.logout.load(Ordering::SeqCst), 0);
}

#[test]
fn test_qr_hint_feeds_login_form() {
    let hint = LoginHint::parse(r#"{"url":"https://sztab.example.org","user":"anna"}"#).unwrap();
    assert_eq!(hint.url, "https://sztab.example.org");
    assert_eq!(hint.user, "anna");

    // a malformed payload is an error, prior form state stays untouched
    assert!(LoginHint::parse("not json").is_err());
}
