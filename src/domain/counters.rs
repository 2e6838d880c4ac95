//! Counting-crew roster and selection.

use std::fmt;

/// A person who may be credited with counting a donation box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingPerson {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl CountingPerson {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for CountingPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Tracks who is credited with counting the current box.
///
/// The roster is partitioned by id into an available pool and an ordered
/// selection (selection order is display order). A person is never in both
/// views, and the selection never holds the same id twice.
#[derive(Debug, Clone, Default)]
pub struct CounterSelection {
    available: Vec<CountingPerson>,
    selected: Vec<CountingPerson>,
}

impl CounterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool with a fresh roster and seed the authenticated
    /// user's own entry into the selection. Idempotent: reloading the same
    /// roster does not duplicate the self-seed, and an already selected
    /// person stays selected rather than reappearing in the pool.
    pub fn load(&mut self, roster: Vec<CountingPerson>, self_id: i64) {
        self.available = roster
            .into_iter()
            .filter(|p| !self.is_selected(p.id))
            .collect();

        if let Some(pos) = self.available.iter().position(|p| p.id == self_id) {
            let me = self.available.remove(pos);
            self.selected.push(me);
        }
    }

    /// Move a person from the pool into the selection. No-op when the id
    /// is already selected.
    pub fn select(&mut self, id: i64) {
        if self.is_selected(id) {
            return;
        }
        if let Some(pos) = self.available.iter().position(|p| p.id == id) {
            let person = self.available.remove(pos);
            self.selected.push(person);
        }
    }

    /// Move a selected person back into the pool.
    pub fn deselect(&mut self, id: i64) {
        if let Some(pos) = self.selected.iter().position(|p| p.id == id) {
            let person = self.selected.remove(pos);
            self.available.push(person);
        }
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.iter().any(|p| p.id == id)
    }

    /// Selected people in selection order.
    pub fn selected(&self) -> &[CountingPerson] {
        &self.selected
    }

    pub fn available(&self) -> &[CountingPerson] {
        &self.available
    }

    /// Case-insensitive substring match on first or last name over the
    /// available pool. Blank queries return the whole pool. Selected people
    /// are excluded by construction, not by filtering.
    pub fn filter(&self, query: &str) -> Vec<&CountingPerson> {
        let needle = query.trim().to_lowercase();
        self.available
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.first_name.to_lowercase().contains(&needle)
                    || p.last_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Comma-joined selected ids, the shape the settlement wire expects.
    pub fn selected_ids_joined(&self) -> String {
        self.selected
            .iter()
            .map(|p| p.id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Drop all state. Used when the settlement target changes.
    pub fn reset(&mut self) {
        self.available.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<CountingPerson> {
        vec![
            CountingPerson::new(1, "Anna", "Kowalska"),
            CountingPerson::new(2, "Piotr", "Nowak"),
            CountingPerson::new(3, "Maria", "Wiśniewska"),
        ]
    }

    #[test]
    fn test_load_seeds_self_once() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 2);

        assert_eq!(selection.selected().len(), 1);
        assert_eq!(selection.selected()[0].id, 2);
        assert_eq!(selection.available().len(), 2);

        // reloading the same roster must not duplicate the seed
        selection.load(roster(), 2);
        assert_eq!(selection.selected().len(), 1);
        assert_eq!(selection.available().len(), 2);
    }

    #[test]
    fn test_load_with_unknown_self_id() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 99);

        assert!(selection.selected().is_empty());
        assert_eq!(selection.available().len(), 3);
    }

    #[test]
    fn test_select_deselect_round_trip() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 99);

        selection.select(1);
        assert!(selection.is_selected(1));
        assert_eq!(selection.available().len(), 2);

        selection.deselect(1);
        assert!(!selection.is_selected(1));
        assert_eq!(selection.available().len(), 3);
    }

    #[test]
    fn test_repeated_select_is_idempotent() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 99);

        selection.select(3);
        selection.select(3);
        selection.select(3);

        assert_eq!(selection.selected().len(), 1);
        assert_eq!(selection.available().len(), 2);
    }

    #[test]
    fn test_filter_excludes_selected() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 99);
        selection.select(1);

        let hits = selection.filter("");
        assert!(hits.iter().all(|p| p.id != 1));

        let hits = selection.filter("kowal");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_filter_matches_either_name() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 99);

        assert_eq!(selection.filter("piotr").len(), 1);
        assert_eq!(selection.filter("WIŚ").len(), 1);
        assert_eq!(selection.filter("nobody").len(), 0);
    }

    #[test]
    fn test_selection_order_preserved_in_wire_ids() {
        let mut selection = CounterSelection::new();
        selection.load(roster(), 2);
        selection.select(3);
        selection.select(1);

        assert_eq!(selection.selected_ids_joined(), "2,3,1");
    }
}
