//! Wire types for the collection-server API.
//!
//! The server speaks Polish field names; renames keep the Rust side
//! readable. Envelope types stay crate-private, the statistics rows are
//! public because they pass through to the caller unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub login: &'a str,
    pub haslo: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub token: String,
    #[serde(rename = "expiresAt", default)]
    pub expires_at: String,
}

/// Token and expiry issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry timestamp exactly as the server sent it.
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonRow {
    pub id: i64,
    pub imie: String,
    pub nazwisko: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountersResponse {
    pub success: bool,
    #[serde(default)]
    pub liczacy: Vec<PersonRow>,
    #[serde(rename = "mojeId", default)]
    pub moje_id: i64,
}

/// The counting-crew roster plus the caller's own id within it.
#[derive(Debug, Clone)]
pub struct CounterRoster {
    pub people: Vec<crate::domain::CountingPerson>,
    pub self_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VolunteerRow {
    pub id: i64,
    #[serde(rename = "numerID", default)]
    pub numer_id: String,
    pub imie: String,
    pub nazwisko: String,
    #[serde(default)]
    pub zaznaczony: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VolunteerListResponse {
    pub success: bool,
    #[serde(default)]
    pub wolontariusze: Vec<VolunteerRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VolunteerDetailResponse {
    pub success: bool,
    pub wolontariusz: VolunteerRow,
    #[serde(rename = "hadTerminal", default)]
    pub had_terminal: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettlementResponse {
    pub success: bool,
    #[serde(rename = "rozliczenieID", default)]
    pub settlement_id: i64,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a settlement POST. `success: false` carries the server's
/// human-readable reason verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { settlement_id: i64 },
    Rejected { message: String },
}

/// Per-counter aggregate (how many boxes a person counted, total value).
#[derive(Debug, Clone, Deserialize)]
pub struct CountingStat {
    pub id: i64,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "liczbaRozliczen")]
    pub settlements: u32,
    #[serde(rename = "suma", with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountingStatsResponse {
    pub success: bool,
    #[serde(default)]
    pub liczacy: Vec<CountingStat>,
}

/// Event-wide total collected so far.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSummary {
    #[serde(rename = "sumaCalkowita", with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
}

/// Leaderboard row of the summary screen.
#[derive(Debug, Clone, Deserialize)]
pub struct TopVolunteer {
    #[serde(rename = "numerID")]
    pub display_id: String,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "suma", with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub success: bool,
    pub summary: EventSummary,
    #[serde(rename = "topWolontariusze", default)]
    pub top_volunteers: Vec<TopVolunteer>,
}

/// Per-volunteer aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct VolunteerStat {
    pub id: i64,
    #[serde(rename = "numerID")]
    pub display_id: String,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "suma", with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VolunteerStatsResponse {
    pub success: bool,
    #[serde(default)]
    pub wolontariusze: Vec<VolunteerStat>,
}

/// The aggregate views fetched read-only from the server.
#[derive(Debug, Clone)]
pub struct SummaryStats {
    pub summary: EventSummary,
    pub top_volunteers: Vec<TopVolunteer>,
}
