//! Server-agnostic settlement domain: denominations, tallies, the counting
//! crew and the outbound settlement record.

mod counters;
mod denomination;
mod submission;
mod tally;
mod volunteer;

pub use counters::{CounterSelection, CountingPerson};
pub use denomination::Denomination;
pub use submission::{SettlementNotes, SettlementSubmission, ROOM_MAIN, TEXT_NONE};
pub use tally::{DenominationTally, Summary};
pub use volunteer::{Volunteer, VolunteerBox};
