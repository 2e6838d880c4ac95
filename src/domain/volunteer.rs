//! Volunteers and the settlement target.

/// One row of the volunteer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volunteer {
    pub id: i64,
    /// Human-readable collection-box code printed on the volunteer badge.
    pub display_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the volunteer's box has already been settled.
    pub settled: bool,
}

/// The volunteer whose box is being reconciled right now.
///
/// Created when a settlement is opened, mutated only indirectly through the
/// tally and counter selection, and discarded once the attempt ends. The
/// terminal flag comes from the server and stays fixed for the lifetime of
/// the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerBox {
    pub volunteer_id: i64,
    pub display_id: String,
    pub first_name: String,
    pub last_name: String,
    pub has_card_terminal: bool,
}

impl VolunteerBox {
    /// Header line a front end shows above the settlement form.
    pub fn headline(&self) -> String {
        format!("{} - {} {}", self.display_id, self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline() {
        let volunteer = VolunteerBox {
            volunteer_id: 7,
            display_id: "WOL-0007".into(),
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            has_card_terminal: false,
        };
        assert_eq!(volunteer.headline(), "WOL-0007 - Jan Kowalski");
    }
}
