use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-day record of which set numbers have been marked done:
/// date (`YYYY-MM-DD`) -> routine id -> exercise id -> completed sets.
///
/// Local-only convenience state. The authoritative record of completed
/// work is the server-side workout log; exercise ids here are weak
/// references and stale ids are simply ignored by the progress
/// calculation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CompletionLedger {
    days: HashMap<String, HashMap<i64, HashMap<i64, Vec<u32>>>>,
}

impl CompletionLedger {
    /// Flip membership of `set_number` for the given key. Toggling a
    /// present number removes it (undo), an absent one adds it. The
    /// stored list stays sorted ascending.
    pub fn toggle(&mut self, date: &str, routine_id: i64, exercise_id: i64, set_number: u32) {
        let sets = self
            .days
            .entry(date.to_string())
            .or_default()
            .entry(routine_id)
            .or_default()
            .entry(exercise_id)
            .or_default();

        if let Some(pos) = sets.iter().position(|&s| s == set_number) {
            sets.remove(pos);
        } else {
            sets.push(set_number);
            sets.sort_unstable();
        }

        if sets.is_empty() {
            self.remove_exercise(date, routine_id, exercise_id);
        }
    }

    pub fn is_set_completed(
        &self,
        date: &str,
        routine_id: i64,
        exercise_id: i64,
        set_number: u32,
    ) -> bool {
        self.days
            .get(date)
            .and_then(|routines| routines.get(&routine_id))
            .and_then(|exercises| exercises.get(&exercise_id))
            .map(|sets| sets.contains(&set_number))
            .unwrap_or(false)
    }

    /// Completed sets per exercise for one routine on one date.
    /// Empty map when nothing has been recorded.
    pub fn get_for_routine(&self, date: &str, routine_id: i64) -> HashMap<i64, Vec<u32>> {
        self.days
            .get(date)
            .and_then(|routines| routines.get(&routine_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether any set of any exercise of `routine_id` is recorded for
    /// `date`. Used at restore time to decide between ledger progress
    /// and the server-log fallback.
    pub fn has_entries_for(&self, date: &str, routine_id: i64) -> bool {
        self.days
            .get(date)
            .and_then(|routines| routines.get(&routine_id))
            .map(|exercises| exercises.values().any(|sets| !sets.is_empty()))
            .unwrap_or(false)
    }

    /// Drop every routine entry for one date.
    pub fn reset_for_date(&mut self, date: &str) {
        self.days.remove(date);
    }

    fn remove_exercise(&mut self, date: &str, routine_id: i64, exercise_id: i64) {
        let Some(routines) = self.days.get_mut(date) else {
            return;
        };
        if let Some(exercises) = routines.get_mut(&routine_id) {
            exercises.remove(&exercise_id);
            if exercises.is_empty() {
                routines.remove(&routine_id);
            }
        }
        if routines.is_empty() {
            self.days.remove(date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "2024-01-01";

    #[test]
    fn toggle_adds_then_removes() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 2);
        assert!(ledger.is_set_completed(DATE, 7, 1, 2));

        ledger.toggle(DATE, 7, 1, 2);
        assert!(!ledger.is_set_completed(DATE, 7, 1, 2));
    }

    #[test]
    fn toggle_twice_is_involution() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle(DATE, 7, 1, 3);
        let before = ledger.clone();

        ledger.toggle(DATE, 7, 1, 2);
        ledger.toggle(DATE, 7, 1, 2);
        assert_eq!(ledger, before);
    }

    #[test]
    fn sets_stay_sorted_regardless_of_toggle_order() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 3);
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle(DATE, 7, 1, 2);

        let completed = ledger.get_for_routine(DATE, 7);
        assert_eq!(completed.get(&1), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn get_for_routine_empty_when_nothing_recorded() {
        let ledger = CompletionLedger::default();
        assert!(ledger.get_for_routine(DATE, 7).is_empty());
        assert!(!ledger.has_entries_for(DATE, 7));
    }

    #[test]
    fn routines_are_keyed_independently() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle(DATE, 8, 1, 1);

        ledger.toggle(DATE, 7, 1, 1);
        assert!(!ledger.has_entries_for(DATE, 7));
        assert!(ledger.has_entries_for(DATE, 8));
    }

    #[test]
    fn reset_for_date_only_clears_that_date() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle("2024-01-02", 7, 1, 1);

        ledger.reset_for_date(DATE);
        assert!(!ledger.has_entries_for(DATE, 7));
        assert!(ledger.has_entries_for("2024-01-02", 7));
    }

    #[test]
    fn undoing_the_last_set_prunes_empty_levels() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle(DATE, 7, 1, 1);
        assert_eq!(ledger, CompletionLedger::default());
    }

    #[test]
    fn serde_shape_matches_persisted_json() {
        let mut ledger = CompletionLedger::default();
        ledger.toggle(DATE, 7, 1, 1);
        ledger.toggle(DATE, 7, 1, 2);

        let json = serde_json::to_string(&ledger).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[DATE]["7"]["1"], serde_json::json!([1, 2]));

        let roundtrip: CompletionLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, ledger);
    }
}
