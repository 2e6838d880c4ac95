//! The fixed set of tallied currency denominations.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;

/// One face-value unit of local currency, counted by piece.
///
/// Six coin subunits (grosze), three whole-unit coins and six banknotes.
/// The set is fixed by the paper settlement form; the server expects all
/// fifteen counts on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Coin1Gr,
    Coin2Gr,
    Coin5Gr,
    Coin10Gr,
    Coin20Gr,
    Coin50Gr,
    Coin1Zl,
    Coin2Zl,
    Coin5Zl,
    Note10Zl,
    Note20Zl,
    Note50Zl,
    Note100Zl,
    Note200Zl,
    Note500Zl,
}

impl Denomination {
    /// Every denomination in tally order (smallest coin to largest note).
    pub const ALL: [Denomination; 15] = [
        Denomination::Coin1Gr,
        Denomination::Coin2Gr,
        Denomination::Coin5Gr,
        Denomination::Coin10Gr,
        Denomination::Coin20Gr,
        Denomination::Coin50Gr,
        Denomination::Coin1Zl,
        Denomination::Coin2Zl,
        Denomination::Coin5Zl,
        Denomination::Note10Zl,
        Denomination::Note20Zl,
        Denomination::Note50Zl,
        Denomination::Note100Zl,
        Denomination::Note200Zl,
        Denomination::Note500Zl,
    ];

    /// Face value in złoty.
    pub fn face_value(&self) -> Decimal {
        match self {
            Denomination::Coin1Gr => dec!(0.01),
            Denomination::Coin2Gr => dec!(0.02),
            Denomination::Coin5Gr => dec!(0.05),
            Denomination::Coin10Gr => dec!(0.10),
            Denomination::Coin20Gr => dec!(0.20),
            Denomination::Coin50Gr => dec!(0.50),
            Denomination::Coin1Zl => dec!(1),
            Denomination::Coin2Zl => dec!(2),
            Denomination::Coin5Zl => dec!(5),
            Denomination::Note10Zl => dec!(10),
            Denomination::Note20Zl => dec!(20),
            Denomination::Note50Zl => dec!(50),
            Denomination::Note100Zl => dec!(100),
            Denomination::Note200Zl => dec!(200),
            Denomination::Note500Zl => dec!(500),
        }
    }

    /// Field name used on the settlement wire format (`m` for coins,
    /// `b` for banknotes).
    pub fn wire_code(&self) -> &'static str {
        match self {
            Denomination::Coin1Gr => "m1gr",
            Denomination::Coin2Gr => "m2gr",
            Denomination::Coin5Gr => "m5gr",
            Denomination::Coin10Gr => "m10gr",
            Denomination::Coin20Gr => "m20gr",
            Denomination::Coin50Gr => "m50gr",
            Denomination::Coin1Zl => "m1zl",
            Denomination::Coin2Zl => "m2zl",
            Denomination::Coin5Zl => "m5zl",
            Denomination::Note10Zl => "b10zl",
            Denomination::Note20Zl => "b20zl",
            Denomination::Note50Zl => "b50zl",
            Denomination::Note100Zl => "b100zl",
            Denomination::Note200Zl => "b200zl",
            Denomination::Note500Zl => "b500zl",
        }
    }

    pub fn is_banknote(&self) -> bool {
        self.wire_code().starts_with('b')
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_code())
    }
}

impl FromStr for Denomination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Denomination::ALL
            .iter()
            .find(|d| d.wire_code() == s)
            .copied()
            .ok_or_else(|| format!("unknown denomination '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_values_sum() {
        // 0.01+0.02+0.05+0.10+0.20+0.50 + 1+2+5 + 10+20+50+100+200+500
        let total: Decimal = Denomination::ALL.iter().map(|d| d.face_value()).sum();
        assert_eq!(total, dec!(888.88));
    }

    #[test]
    fn test_wire_codes_round_trip() {
        for d in Denomination::ALL {
            assert_eq!(d.wire_code().parse::<Denomination>().unwrap(), d);
        }
    }

    #[test]
    fn test_coin_note_split() {
        let notes = Denomination::ALL.iter().filter(|d| d.is_banknote()).count();
        assert_eq!(notes, 6);
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!("b1000zl".parse::<Denomination>().is_err());
    }
}
