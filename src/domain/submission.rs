//! The outbound settlement record.

use rust_decimal::Decimal;
use serde::Serialize;

use super::counters::CounterSelection;
use super::denomination::Denomination;
use super::tally::DenominationTally;

/// Sentinel stored in free-text fields left blank ("none").
pub const TEXT_NONE: &str = "BRAK";
/// Sentinel stored in the room field when left blank ("main hall").
pub const ROOM_MAIN: &str = "GŁÓWNA";

/// Free-text fields of the settlement form. All optional; blanks are
/// replaced with the server's sentinel values at build time.
#[derive(Debug, Clone, Default)]
pub struct SettlementNotes {
    pub foreign_currency: String,
    pub other_donations: String,
    pub counters_remarks: String,
    pub volunteer_remarks: String,
    pub room: String,
}

/// The settlement record as the server expects it, built fresh for each
/// submit attempt and never mutated afterwards. Field names match the wire
/// format exactly.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct SettlementSubmission {
    terminal: u8,
    #[serde(with = "rust_decimal::serde::float")]
    kwotaZTerminala: Decimal,
    m1gr: u32,
    m2gr: u32,
    m5gr: u32,
    m10gr: u32,
    m20gr: u32,
    m50gr: u32,
    m1zl: u32,
    m2zl: u32,
    m5zl: u32,
    b10zl: u32,
    b20zl: u32,
    b50zl: u32,
    b100zl: u32,
    b200zl: u32,
    b500zl: u32,
    walutaObca: String,
    daryInne: String,
    uwagiLiczacych: String,
    uwagiWolontariusza: String,
    sala: String,
    liczacy: String,
}

fn or_sentinel(raw: &str, sentinel: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else {
        trimmed.to_string()
    }
}

impl SettlementSubmission {
    /// Assemble the record from the current form state.
    pub fn build(
        tally: &DenominationTally,
        selection: &CounterSelection,
        notes: &SettlementNotes,
    ) -> Self {
        let count = |d: Denomination| tally.count(d);

        Self {
            terminal: u8::from(tally.terminal_enabled()),
            kwotaZTerminala: tally.terminal_amount(),
            m1gr: count(Denomination::Coin1Gr),
            m2gr: count(Denomination::Coin2Gr),
            m5gr: count(Denomination::Coin5Gr),
            m10gr: count(Denomination::Coin10Gr),
            m20gr: count(Denomination::Coin20Gr),
            m50gr: count(Denomination::Coin50Gr),
            m1zl: count(Denomination::Coin1Zl),
            m2zl: count(Denomination::Coin2Zl),
            m5zl: count(Denomination::Coin5Zl),
            b10zl: count(Denomination::Note10Zl),
            b20zl: count(Denomination::Note20Zl),
            b50zl: count(Denomination::Note50Zl),
            b100zl: count(Denomination::Note100Zl),
            b200zl: count(Denomination::Note200Zl),
            b500zl: count(Denomination::Note500Zl),
            walutaObca: or_sentinel(&notes.foreign_currency, TEXT_NONE),
            daryInne: or_sentinel(&notes.other_donations, TEXT_NONE),
            uwagiLiczacych: or_sentinel(&notes.counters_remarks, TEXT_NONE),
            uwagiWolontariusza: or_sentinel(&notes.volunteer_remarks, TEXT_NONE),
            sala: or_sentinel(&notes.room, ROOM_MAIN),
            liczacy: selection.selected_ids_joined(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::counters::CountingPerson;

    fn form_state() -> (DenominationTally, CounterSelection) {
        let mut tally = DenominationTally::new();
        tally.set_card_terminal(true);
        tally.set_count(Denomination::Coin1Zl, "3");
        tally.set_count(Denomination::Note10Zl, "2");
        tally.set_terminal_amount("15.50");

        let mut selection = CounterSelection::new();
        selection.load(
            vec![
                CountingPerson::new(4, "Anna", "Kowalska"),
                CountingPerson::new(9, "Piotr", "Nowak"),
            ],
            4,
        );
        selection.select(9);

        (tally, selection)
    }

    #[test]
    fn test_wire_shape() {
        let (tally, selection) = form_state();
        let submission =
            SettlementSubmission::build(&tally, &selection, &SettlementNotes::default());

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["terminal"], 1);
        assert_eq!(json["kwotaZTerminala"], 15.5);
        assert_eq!(json["m1zl"], 3);
        assert_eq!(json["b10zl"], 2);
        assert_eq!(json["m2gr"], 0);
        assert_eq!(json["walutaObca"], "BRAK");
        assert_eq!(json["sala"], "GŁÓWNA");
        assert_eq!(json["liczacy"], "4,9");
    }

    #[test]
    fn test_notes_are_trimmed_not_blanked() {
        let (tally, selection) = form_state();
        let notes = SettlementNotes {
            foreign_currency: "  10 EUR  ".into(),
            room: "   ".into(),
            ..Default::default()
        };
        let submission = SettlementSubmission::build(&tally, &selection, &notes);

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["walutaObca"], "10 EUR");
        assert_eq!(json["sala"], "GŁÓWNA");
    }

    #[test]
    fn test_terminal_flag_follows_toggle() {
        let (mut tally, selection) = form_state();
        tally.set_terminal_enabled(false);
        let submission =
            SettlementSubmission::build(&tally, &selection, &SettlementNotes::default());

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["terminal"], 0);
        assert_eq!(json["kwotaZTerminala"], 0.0);
        // the cash counts are untouched by the toggle
        assert_eq!(json["m1zl"], 3);
    }
}
