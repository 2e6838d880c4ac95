//! The settlement workflow state machine.
//!
//! One [`SettlementSession`] drives the reconciliation of a single
//! volunteer's box: load the target and the counting-crew roster, collect
//! form input, submit, report the outcome. The session owns its tally and
//! counter selection exclusively; opening a new target resets both.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::{CollectionApi, SubmitOutcome};
use crate::domain::{
    CounterSelection, CountingPerson, Denomination, DenominationTally, SettlementNotes,
    SettlementSubmission, Summary, VolunteerBox,
};
use crate::session::{clear_session, CredentialStore, Session};

/// Where the workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Submitting,
    Succeeded { settlement_id: i64 },
    /// Load or submit failed; the message is shown verbatim and the form
    /// state is kept so the user can retry.
    Failed { message: String },
    /// The session snapshot is missing, expired or was rejected. The
    /// credential store has been cleared; the host navigates to login.
    Unauthenticated,
}

/// One form edit, routed to the tally or the counter selection. Every
/// front-end event (text changed, chip tapped, switch toggled) maps to one
/// of these.
#[derive(Debug, Clone)]
pub enum FormInput {
    Count(Denomination, String),
    TerminalAmount(String),
    TerminalEnabled(bool),
    ForeignCurrency(String),
    OtherDonations(String),
    CountersRemarks(String),
    VolunteerRemarks(String),
    Room(String),
    SelectCounter(i64),
    DeselectCounter(i64),
}

/// Sequential settlement workflow for one volunteer at a time.
pub struct SettlementSession {
    gateway: Arc<dyn CollectionApi>,
    store: Arc<dyn CredentialStore>,
    phase: Phase,
    volunteer: Option<VolunteerBox>,
    tally: DenominationTally,
    selection: CounterSelection,
    notes: SettlementNotes,
    /// Bumped by `open` and `abandon`; async completions from an earlier
    /// generation are discarded instead of mutating the new target's state.
    generation: u64,
}

impl SettlementSession {
    pub fn new(gateway: Arc<dyn CollectionApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            store,
            phase: Phase::Idle,
            volunteer: None,
            tally: DenominationTally::new(),
            selection: CounterSelection::new(),
            notes: SettlementNotes::default(),
            generation: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn volunteer(&self) -> Option<&VolunteerBox> {
        self.volunteer.as_ref()
    }

    /// Current totals, recomputed on every call.
    pub fn summary(&self) -> Summary {
        self.tally.summary()
    }

    pub fn tally(&self) -> &DenominationTally {
        &self.tally
    }

    pub fn selected_counters(&self) -> &[CountingPerson] {
        self.selection.selected()
    }

    /// Pickable pool filtered by a search query. Never contains a selected
    /// person.
    pub fn filter_counters(&self, query: &str) -> Vec<&CountingPerson> {
        self.selection.filter(query)
    }

    /// Start a settlement for the given volunteer. Any state from a
    /// previous target is cleared before the load begins.
    pub async fn open(&mut self, volunteer_id: i64) -> &Phase {
        self.generation += 1;
        let generation = self.generation;

        self.volunteer = None;
        self.tally.reset();
        self.selection.reset();
        self.notes = SettlementNotes::default();
        self.phase = Phase::Loading;

        let Some(session) = self.authenticated_session() else {
            return &self.phase;
        };

        info!(volunteer_id, "loading settlement target");
        let detail = self.gateway.fetch_volunteer_detail(&session, volunteer_id).await;
        if self.generation != generation {
            // target changed while the request was in flight
            return &self.phase;
        }
        let volunteer = match detail {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };

        let roster = self.gateway.fetch_counters(&session).await;
        if self.generation != generation {
            return &self.phase;
        }
        let roster = match roster {
            Ok(r) => r,
            Err(e) => return self.fail(e),
        };

        self.tally.set_card_terminal(volunteer.has_card_terminal);
        self.selection.load(roster.people, roster.self_id);
        self.volunteer = Some(volunteer);
        self.phase = Phase::Ready;
        &self.phase
    }

    /// Apply one form edit. Returns whether the edit was accepted; edits
    /// are only valid once a target is loaded and while no request is in
    /// flight.
    pub fn edit(&mut self, input: FormInput) -> bool {
        let editable = self.volunteer.is_some()
            && matches!(self.phase, Phase::Ready | Phase::Failed { .. });
        if !editable {
            return false;
        }

        match input {
            FormInput::Count(denomination, raw) => self.tally.set_count(denomination, &raw),
            FormInput::TerminalAmount(raw) => self.tally.set_terminal_amount(&raw),
            FormInput::TerminalEnabled(enabled) => self.tally.set_terminal_enabled(enabled),
            FormInput::ForeignCurrency(text) => self.notes.foreign_currency = text,
            FormInput::OtherDonations(text) => self.notes.other_donations = text,
            FormInput::CountersRemarks(text) => self.notes.counters_remarks = text,
            FormInput::VolunteerRemarks(text) => self.notes.volunteer_remarks = text,
            FormInput::Room(text) => self.notes.room = text,
            FormInput::SelectCounter(id) => self.selection.select(id),
            FormInput::DeselectCounter(id) => self.selection.deselect(id),
        }
        true
    }

    /// Submit the settlement record. Valid from `Ready`, and from `Failed`
    /// to retry; the form state survives a failed attempt untouched.
    pub async fn submit(&mut self) -> &Phase {
        let Some(volunteer_id) = self.volunteer.as_ref().map(|v| v.volunteer_id) else {
            return &self.phase;
        };
        if !matches!(self.phase, Phase::Ready | Phase::Failed { .. }) {
            return &self.phase;
        }
        let generation = self.generation;

        let Some(session) = self.authenticated_session() else {
            return &self.phase;
        };

        self.phase = Phase::Submitting;
        let submission = SettlementSubmission::build(&self.tally, &self.selection, &self.notes);

        let outcome = self
            .gateway
            .submit_settlement(&session, volunteer_id, &submission)
            .await;
        if self.generation != generation {
            return &self.phase;
        }

        match outcome {
            Ok(SubmitOutcome::Accepted { settlement_id }) => {
                info!(volunteer_id, settlement_id, "settlement accepted");
                self.phase = Phase::Succeeded { settlement_id };
            }
            Ok(SubmitOutcome::Rejected { message }) => {
                warn!(volunteer_id, message = %message, "settlement rejected");
                self.phase = Phase::Failed { message };
            }
            Err(e) => {
                self.fail(e);
            }
        }
        &self.phase
    }

    /// Discard the current target, e.g. when the user navigates away while
    /// a request is still in flight. Any late completion is ignored.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.volunteer = None;
        self.tally.reset();
        self.selection.reset();
        self.notes = SettlementNotes::default();
        self.phase = Phase::Idle;
    }

    /// Load and expiry-check the session snapshot. On failure the store is
    /// cleared and the phase flips to `Unauthenticated` without any
    /// network call.
    fn authenticated_session(&mut self) -> Option<Session> {
        match Session::load(self.store.as_ref()) {
            Some(session) if !session.is_expired(Utc::now()) => Some(session),
            _ => {
                self.sign_out();
                None
            }
        }
    }

    fn sign_out(&mut self) {
        warn!("session missing or expired, forcing re-authentication");
        clear_session(self.store.as_ref());
        self.phase = Phase::Unauthenticated;
    }

    fn fail(&mut self, error: crate::error::ApiError) -> &Phase {
        if error.requires_login() {
            self.sign_out();
        } else {
            warn!(error = %error, "settlement operation failed");
            self.phase = Phase::Failed {
                message: error.to_string(),
            };
        }
        &self.phase
    }
}
