//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests). Provides an in-memory credential store and a
//! scripted gateway so the settlement workflow can be driven end to end
//! without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiResult, CollectionApi, CounterRoster, CountingStat, IssuedToken, SubmitOutcome,
    SummaryStats, VolunteerStat,
};
use crate::domain::{CountingPerson, SettlementSubmission, Volunteer, VolunteerBox};
use crate::error::ApiError;
use crate::session::{CredentialStore, Session};

/// Credential store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// Scripted [`CollectionApi`] double.
///
/// Each operation returns a pre-programmed response and counts its calls,
/// so tests can assert both outcomes and that no network round trip
/// happened when the workflow must fail fast.
pub struct ScriptedApi {
    pub detail: Mutex<ApiResult<VolunteerBox>>,
    pub roster: Mutex<ApiResult<CounterRoster>>,
    pub submit: Mutex<ApiResult<SubmitOutcome>>,
    pub calls: CallCounters,
    /// Last submission the fake received, for wire-shape assertions.
    pub last_submission: Mutex<Option<SettlementSubmission>>,
    /// When set, `logout` fails with a network error.
    pub fail_logout: std::sync::atomic::AtomicBool,
}

#[derive(Debug, Default)]
pub struct CallCounters {
    pub detail: AtomicUsize,
    pub roster: AtomicUsize,
    pub submit: AtomicUsize,
    pub logout: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            detail: Mutex::new(Ok(sample_volunteer_box(7, false))),
            roster: Mutex::new(Ok(sample_roster(4))),
            submit: Mutex::new(Ok(SubmitOutcome::Accepted { settlement_id: 1 })),
            calls: CallCounters::default(),
            last_submission: Mutex::new(None),
            fail_logout: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn with_detail(self, detail: ApiResult<VolunteerBox>) -> Self {
        *self.detail.lock().unwrap() = detail;
        self
    }

    pub fn with_roster(self, roster: ApiResult<CounterRoster>) -> Self {
        *self.roster.lock().unwrap() = roster;
        self
    }

    pub fn with_submit(self, submit: ApiResult<SubmitOutcome>) -> Self {
        *self.submit.lock().unwrap() = submit;
        self
    }

    pub fn network_calls(&self) -> usize {
        self.calls.detail.load(Ordering::SeqCst)
            + self.calls.roster.load(Ordering::SeqCst)
            + self.calls.submit.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionApi for ScriptedApi {
    async fn check_reachable(&self, _base_url: &str) -> ApiResult<()> {
        Ok(())
    }

    async fn login(
        &self,
        _base_url: &str,
        _username: &str,
        _password: &str,
    ) -> ApiResult<IssuedToken> {
        Ok(IssuedToken {
            token: "scripted-token".into(),
            expires_at: "2099-01-01T00:00:00Z".into(),
        })
    }

    async fn logout(&self, _session: &Session) -> ApiResult<()> {
        self.calls.logout.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".into()));
        }
        Ok(())
    }

    async fn fetch_volunteers(&self, _session: &Session) -> ApiResult<Vec<Volunteer>> {
        Ok(Vec::new())
    }

    async fn fetch_volunteer_detail(
        &self,
        _session: &Session,
        _volunteer_id: i64,
    ) -> ApiResult<VolunteerBox> {
        self.calls.detail.fetch_add(1, Ordering::SeqCst);
        self.detail.lock().unwrap().clone()
    }

    async fn submit_settlement(
        &self,
        _session: &Session,
        _volunteer_id: i64,
        submission: &SettlementSubmission,
    ) -> ApiResult<SubmitOutcome> {
        self.calls.submit.fetch_add(1, Ordering::SeqCst);
        *self.last_submission.lock().unwrap() = Some(submission.clone());
        self.submit.lock().unwrap().clone()
    }

    async fn fetch_counters(&self, _session: &Session) -> ApiResult<CounterRoster> {
        self.calls.roster.fetch_add(1, Ordering::SeqCst);
        self.roster.lock().unwrap().clone()
    }

    async fn fetch_counting_stats(&self, _session: &Session) -> ApiResult<Vec<CountingStat>> {
        Ok(Vec::new())
    }

    async fn fetch_summary(&self, _session: &Session) -> ApiResult<SummaryStats> {
        Err(ApiError::Network("not scripted".into()))
    }

    async fn fetch_volunteer_stats(&self, _session: &Session) -> ApiResult<Vec<VolunteerStat>> {
        Ok(Vec::new())
    }
}

/// A settlement target for tests.
pub fn sample_volunteer_box(volunteer_id: i64, has_card_terminal: bool) -> VolunteerBox {
    VolunteerBox {
        volunteer_id,
        display_id: format!("WOL-{volunteer_id:04}"),
        first_name: "Jan".into(),
        last_name: "Kowalski".into(),
        has_card_terminal,
    }
}

/// A three-person roster where `self_id` is the authenticated user.
pub fn sample_roster(self_id: i64) -> CounterRoster {
    CounterRoster {
        people: vec![
            CountingPerson::new(4, "Anna", "Kowalska"),
            CountingPerson::new(9, "Piotr", "Nowak"),
            CountingPerson::new(11, "Maria", "Wiśniewska"),
        ],
        self_id,
    }
}

/// A store pre-loaded with a valid, far-future session.
pub fn logged_in_store() -> MemoryStore {
    let store = MemoryStore::default();
    crate::session::store_session(
        &store,
        "test-token",
        "2099-01-01T00:00:00Z",
        "https://sztab.example.org",
        "anna",
    );
    store
}
