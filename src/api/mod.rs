//! Typed gateway to the collection server.
//!
//! [`CollectionApi`] is the seam the settlement workflow is written
//! against; [`HttpApi`] is the production implementation. Test doubles
//! live in the `testkit` module.

mod dto;
mod http;

pub use dto::{
    CounterRoster, CountingStat, EventSummary, IssuedToken, SubmitOutcome, SummaryStats,
    TopVolunteer, VolunteerStat,
};
pub use http::HttpApi;

use async_trait::async_trait;

use crate::domain::{SettlementSubmission, Volunteer, VolunteerBox};
use crate::error::ApiError;
use crate::session::Session;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the remote collection server exposes.
///
/// Every authenticated call takes the session snapshot by reference; the
/// gateway holds no credential state of its own.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// Probe `{base_url}/api`. Succeeds only on HTTP 200 or 201.
    async fn check_reachable(&self, base_url: &str) -> ApiResult<()>;

    /// Exchange credentials for a session token.
    async fn login(&self, base_url: &str, username: &str, password: &str)
        -> ApiResult<IssuedToken>;

    /// Invalidate the token server-side. Callers treat failure as
    /// non-fatal; local sign-out proceeds regardless.
    async fn logout(&self, session: &Session) -> ApiResult<()>;

    /// Volunteers available for settlement.
    async fn fetch_volunteers(&self, session: &Session) -> ApiResult<Vec<Volunteer>>;

    /// Settlement target details, including the card-terminal flag.
    async fn fetch_volunteer_detail(
        &self,
        session: &Session,
        volunteer_id: i64,
    ) -> ApiResult<VolunteerBox>;

    /// POST one settlement record.
    async fn submit_settlement(
        &self,
        session: &Session,
        volunteer_id: i64,
        submission: &SettlementSubmission,
    ) -> ApiResult<SubmitOutcome>;

    /// Counting-crew roster plus the caller's own id.
    async fn fetch_counters(&self, session: &Session) -> ApiResult<CounterRoster>;

    /// Read-only aggregates, deserialization only.
    async fn fetch_counting_stats(&self, session: &Session) -> ApiResult<Vec<CountingStat>>;
    async fn fetch_summary(&self, session: &Session) -> ApiResult<SummaryStats>;
    async fn fetch_volunteer_stats(&self, session: &Session) -> ApiResult<Vec<VolunteerStat>>;
}
