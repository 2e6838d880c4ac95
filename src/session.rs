//! Session snapshot and the credential-store port.
//!
//! The host application owns credential persistence (a mobile shell would
//! use its preference store, the CLI uses a JSON file). The core only sees
//! the [`CredentialStore`] capability and borrows a read-only [`Session`]
//! snapshot per operation; it never holds credentials across calls.

use chrono::{DateTime, Utc};

/// Storage keys shared between the login flow and every reader.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const TOKEN_EXPIRES_AT: &str = "token_expires_at";
    pub const BASE_URL: &str = "base_url";
    pub const USERNAME: &str = "username";
}

/// Opaque key-value persistence for credentials.
///
/// Implementations are expected to be cheap to call; the core reads a fresh
/// snapshot before every server-dependent operation.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Read-only snapshot of the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub base_url: String,
    pub username: String,
    /// Parsed from the stored expiry string; `None` when the server never
    /// sent one or the stored value does not parse.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Load a snapshot from the store. Returns `None` when either the token
    /// or the base URL is missing or blank, which callers must treat as
    /// "re-authenticate".
    pub fn load(store: &dyn CredentialStore) -> Option<Self> {
        let token = store.get(keys::AUTH_TOKEN).filter(|t| !t.is_empty())?;
        let base_url = store.get(keys::BASE_URL).filter(|u| !u.is_empty())?;
        let username = store.get(keys::USERNAME).unwrap_or_default();
        let expires_at = store
            .get(keys::TOKEN_EXPIRES_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Self {
            token,
            base_url,
            username,
            expires_at,
        })
    }

    /// Whether the token expiry lies in the past. An absent expiry is
    /// treated as not expired, matching the lenient check the original
    /// workflow applies.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at < now)
    }
}

/// Persist a freshly issued session. The expiry string is stored verbatim;
/// [`Session::load`] tolerates values that do not parse.
pub fn store_session(
    store: &dyn CredentialStore,
    token: &str,
    expires_at: &str,
    base_url: &str,
    username: &str,
) {
    store.set(keys::AUTH_TOKEN, token);
    store.set(keys::TOKEN_EXPIRES_AT, expires_at);
    store.set(keys::BASE_URL, base_url);
    store.set(keys::USERNAME, username);
}

/// Remove every credential key. Used on logout and on auth failures.
pub fn clear_session(store: &dyn CredentialStore) {
    store.remove(keys::AUTH_TOKEN);
    store.remove(keys::TOKEN_EXPIRES_AT);
    store.remove(keys::BASE_URL);
    store.remove(keys::USERNAME);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MemoryStore;
    use chrono::TimeZone;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::default();
        store_session(
            &store,
            "tok-123",
            "2026-01-12T20:00:00Z",
            "https://sztab.example.org",
            "anna",
        );
        store
    }

    #[test]
    fn test_load_round_trip() {
        let store = seeded_store();
        let session = Session::load(&store).unwrap();

        assert_eq!(session.token, "tok-123");
        assert_eq!(session.base_url, "https://sztab.example.org");
        assert_eq!(session.username, "anna");
        assert_eq!(
            session.expires_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 12, 20, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_token_yields_none() {
        let store = seeded_store();
        store.remove(keys::AUTH_TOKEN);
        assert!(Session::load(&store).is_none());
    }

    #[test]
    fn test_unparsable_expiry_is_tolerated() {
        let store = seeded_store();
        store.set(keys::TOKEN_EXPIRES_AT, "next tuesday");

        let session = Session::load(&store).unwrap();
        assert!(session.expires_at.is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_expiry_comparison() {
        let store = seeded_store();
        let session = Session::load(&store).unwrap();

        let before = Utc.with_ymd_and_hms(2026, 1, 12, 19, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 1, 12, 21, 0, 0).unwrap();
        assert!(!session.is_expired(before));
        assert!(session.is_expired(after));
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = seeded_store();
        clear_session(&store);

        assert!(Session::load(&store).is_none());
        assert!(store.get(keys::USERNAME).is_none());
    }
}
