//! Per-denomination counts and the settlement summary.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::denomination::Denomination;

/// Totals derived from a [`DenominationTally`]. Recomputed on demand,
/// never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub cash_total: Decimal,
    pub terminal_total: Decimal,
    pub grand_total: Decimal,
    /// Whether the terminal line items are meaningful for display. When
    /// false a front end shows the grand total only.
    pub show_terminal: bool,
}

/// Mutable tally of denomination counts plus the optional card-terminal
/// amount for one settlement attempt.
///
/// Input arrives as raw text straight from form fields. Anything that does
/// not parse counts as zero; a half-typed number must never block the
/// running total.
#[derive(Debug, Clone, Default)]
pub struct DenominationTally {
    counts: HashMap<Denomination, u32>,
    terminal_amount: Decimal,
    terminal_enabled: bool,
    has_card_terminal: bool,
}

impl DenominationTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the server-supplied terminal flag for this settlement attempt.
    /// Enables the terminal entry when the volunteer carried one.
    pub fn set_card_terminal(&mut self, has_card_terminal: bool) {
        self.has_card_terminal = has_card_terminal;
        self.terminal_enabled = has_card_terminal;
        if !has_card_terminal {
            self.terminal_amount = Decimal::ZERO;
        }
    }

    pub fn has_card_terminal(&self) -> bool {
        self.has_card_terminal
    }

    pub fn terminal_enabled(&self) -> bool {
        self.terminal_enabled
    }

    /// Toggle the terminal on or off. Enabling requires the volunteer to
    /// actually carry a terminal; turning it off clears the entered
    /// amount, mirroring the form behavior.
    pub fn set_terminal_enabled(&mut self, enabled: bool) {
        self.terminal_enabled = enabled && self.has_card_terminal;
        if !self.terminal_enabled {
            self.terminal_amount = Decimal::ZERO;
        }
    }

    /// Store a denomination count from raw text. Empty or unparsable text
    /// stores zero; negative values are clamped to zero.
    pub fn set_count(&mut self, denomination: Denomination, raw: &str) {
        let count = raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        self.counts.insert(denomination, count);
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Store the card-terminal amount from raw text, with the same
    /// degrade-to-zero tolerance as the counts. Ignored while the terminal
    /// is off; the amount entry does not exist then.
    pub fn set_terminal_amount(&mut self, raw: &str) {
        if !self.terminal_enabled {
            return;
        }
        self.terminal_amount = Decimal::from_str(raw.trim())
            .ok()
            .filter(|d| !d.is_sign_negative())
            .unwrap_or(Decimal::ZERO);
    }

    pub fn terminal_amount(&self) -> Decimal {
        self.terminal_amount
    }

    /// Compute the current totals.
    pub fn summary(&self) -> Summary {
        let cash_total: Decimal = Denomination::ALL
            .iter()
            .map(|d| Decimal::from(self.count(*d)) * d.face_value())
            .sum();
        let terminal_total = if self.terminal_enabled {
            self.terminal_amount
        } else {
            Decimal::ZERO
        };

        Summary {
            cash_total,
            terminal_total,
            grand_total: cash_total + terminal_total,
            show_terminal: self.has_card_terminal,
        }
    }

    /// Zero every field, including the terminal flag. Used when the
    /// settlement target changes.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.terminal_amount = Decimal::ZERO;
        self.terminal_enabled = false;
        self.has_card_terminal = false;
    }
}
