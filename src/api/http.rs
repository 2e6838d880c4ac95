//! reqwest implementation of the collection-server gateway.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::{
    CounterRoster, CountersResponse, CountingStat, CountingStatsResponse, IssuedToken,
    LoginRequest, LoginResponse, SettlementResponse, SubmitOutcome, SummaryResponse, SummaryStats,
    VolunteerDetailResponse, VolunteerListResponse, VolunteerStat, VolunteerStatsResponse,
};
use super::{ApiResult, CollectionApi};
use crate::domain::{CountingPerson, SettlementSubmission, Volunteer, VolunteerBox};
use crate::error::ApiError;
use crate::session::Session;

/// Auth header carrying the opaque session token.
const TOKEN_HEADER: &str = "x-api-token";
/// Client-generated idempotency key attached to settlement POSTs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the collection-server REST API.
pub struct HttpApi {
    client: Client,
}

impl HttpApi {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    fn require_session(session: &Session) -> ApiResult<()> {
        if session.token.is_empty() || session.base_url.is_empty() {
            return Err(ApiError::PreconditionMissing);
        }
        Ok(())
    }

    fn status_error(status: StatusCode) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::AuthRejected,
            other => ApiError::ServerRejected(other.as_u16()),
        }
    }

    /// Decode a response body, converting non-success statuses first so a
    /// plain-text error page never surfaces as a JSON parse failure.
    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_authed(&self, session: &Session, path: &str) -> ApiResult<Response> {
        Self::require_session(session)?;
        let url = format!("{}{path}", session.base_url);
        debug!(url = %url, "GET");
        Ok(self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &session.token)
            .send()
            .await?)
    }
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl CollectionApi for HttpApi {
    async fn check_reachable(&self, base_url: &str) -> ApiResult<()> {
        let url = format!("{base_url}/api");
        debug!(url = %url, "reachability probe");
        let response = self.client.get(&url).send().await?;

        // the probe endpoint answers 200 or 201 when the helper is up
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            other => Err(Self::status_error(other)),
        }
    }

    async fn login(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> ApiResult<IssuedToken> {
        let url = format!("{base_url}/api/login");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                login: username,
                haslo: password,
            })
            .send()
            .await?;

        let decoded: LoginResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::AuthRejected);
        }

        Ok(IssuedToken {
            token: decoded.token,
            expires_at: decoded.expires_at,
        })
    }

    async fn logout(&self, session: &Session) -> ApiResult<()> {
        Self::require_session(session)?;
        let url = format!("{}/api/logout", session.base_url);
        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &session.token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "logout not acknowledged");
        }
        Ok(())
    }

    async fn fetch_volunteers(&self, session: &Session) -> ApiResult<Vec<Volunteer>> {
        let response = self
            .get_authed(session, "/api/rozliczenia/listawolontariuszy")
            .await?;
        let decoded: VolunteerListResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching volunteers".into(),
            ));
        }

        Ok(decoded
            .wolontariusze
            .into_iter()
            .map(|row| Volunteer {
                id: row.id,
                display_id: row.numer_id,
                first_name: row.imie,
                last_name: row.nazwisko,
                settled: row.zaznaczony == 1,
            })
            .collect())
    }

    async fn fetch_volunteer_detail(
        &self,
        session: &Session,
        volunteer_id: i64,
    ) -> ApiResult<VolunteerBox> {
        let response = self
            .get_authed(
                session,
                &format!("/api/rozliczenia/wolontariusz/{volunteer_id}"),
            )
            .await?;
        let decoded: VolunteerDetailResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching volunteer detail".into(),
            ));
        }

        Ok(VolunteerBox {
            volunteer_id: decoded.wolontariusz.id,
            display_id: decoded.wolontariusz.numer_id,
            first_name: decoded.wolontariusz.imie,
            last_name: decoded.wolontariusz.nazwisko,
            has_card_terminal: decoded.had_terminal,
        })
    }

    async fn submit_settlement(
        &self,
        session: &Session,
        volunteer_id: i64,
        submission: &SettlementSubmission,
    ) -> ApiResult<SubmitOutcome> {
        Self::require_session(session)?;
        let url = format!(
            "{}/api/rozliczenia/wolontariusz/{volunteer_id}",
            session.base_url
        );
        let request_id = Uuid::new_v4();
        debug!(url = %url, request_id = %request_id, "submitting settlement");

        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &session.token)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(submission)
            .send()
            .await?;

        let decoded: SettlementResponse = Self::decode(response).await?;
        if decoded.success {
            Ok(SubmitOutcome::Accepted {
                settlement_id: decoded.settlement_id,
            })
        } else {
            Ok(SubmitOutcome::Rejected {
                message: decoded.message,
            })
        }
    }

    async fn fetch_counters(&self, session: &Session) -> ApiResult<CounterRoster> {
        let response = self.get_authed(session, "/api/users/liczacy").await?;
        let decoded: CountersResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching counters".into(),
            ));
        }

        Ok(CounterRoster {
            people: decoded
                .liczacy
                .into_iter()
                .map(|row| CountingPerson::new(row.id, row.imie, row.nazwisko))
                .collect(),
            self_id: decoded.moje_id,
        })
    }

    async fn fetch_counting_stats(&self, session: &Session) -> ApiResult<Vec<CountingStat>> {
        let response = self.get_authed(session, "/api/statystyki/liczacy").await?;
        let decoded: CountingStatsResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching counting stats".into(),
            ));
        }
        Ok(decoded.liczacy)
    }

    async fn fetch_summary(&self, session: &Session) -> ApiResult<SummaryStats> {
        let response = self
            .get_authed(session, "/api/statystyki/podsumowanie")
            .await?;
        let decoded: SummaryResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching summary".into(),
            ));
        }
        Ok(SummaryStats {
            summary: decoded.summary,
            top_volunteers: decoded.top_volunteers,
        })
    }

    async fn fetch_volunteer_stats(&self, session: &Session) -> ApiResult<Vec<VolunteerStat>> {
        let response = self
            .get_authed(session, "/api/statystyki/wolontariusz")
            .await?;
        let decoded: VolunteerStatsResponse = Self::decode(response).await?;
        if !decoded.success {
            return Err(ApiError::MalformedPayload(
                "server reported failure fetching volunteer stats".into(),
            ));
        }
        Ok(decoded.wolontariusze)
    }
}
