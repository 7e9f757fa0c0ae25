use std::collections::HashMap;

use crate::types::{Routine, WorkoutRecord};

/// Progress from the local completion ledger, used for live UI
/// (progress bars, checkboxes). An exercise never contributes more
/// completed sets than its target, so stale or duplicate ledger
/// entries cannot push the result past 100.
pub fn ledger_progress(routine: &Routine, completed: &HashMap<i64, Vec<u32>>) -> u8 {
    percent_of_targets(routine, |exercise_id| {
        completed.get(&exercise_id).map(|sets| sets.len() as u32).unwrap_or(0)
    })
}

/// Progress from server-recorded workout rows for one date, counting
/// rows per exercise id. Used once, to seed progress when a session is
/// restored and the local ledger has nothing for the day.
pub fn server_log_progress(routine: &Routine, records: &[WorkoutRecord]) -> u8 {
    let mut counts: HashMap<i64, u32> = HashMap::new();
    for record in records {
        *counts.entry(record.exercise_id).or_insert(0) += 1;
    }
    percent_of_targets(routine, |exercise_id| counts.get(&exercise_id).copied().unwrap_or(0))
}

fn percent_of_targets<F>(routine: &Routine, completed_for: F) -> u8
where
    F: Fn(i64) -> u32,
{
    let mut completed_total: u32 = 0;
    let mut target_total: u32 = 0;

    for exercise in &routine.exercises {
        if exercise.sets == 0 {
            continue;
        }
        completed_total += completed_for(exercise.exercise_id).min(exercise.sets);
        target_total += exercise.sets;
    }

    if target_total == 0 {
        return 0;
    }

    let percent = (completed_total as f64 / target_total as f64 * 100.0).round() as u32;
    percent.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoutineExercise;

    fn exercise(id: i64, order: u32, sets: u32) -> RoutineExercise {
        RoutineExercise {
            exercise_id: id,
            exercise_name: format!("Exercise {id}"),
            order_index: order,
            sets,
            reps: 10,
            weight: None,
            rest_time_seconds: 60,
            notes: None,
        }
    }

    fn routine(exercises: Vec<RoutineExercise>) -> Routine {
        Routine { id: 7, name: "Push day".into(), description: None, exercises }
    }

    fn record(exercise_id: i64, set: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: set as i64,
            exercise_id,
            exercise_name: None,
            reps: 10,
            set,
            weight: None,
            seconds: None,
            observations: None,
            date: "2024-01-01".into(),
        }
    }

    #[test]
    fn empty_routine_is_zero_not_division_by_zero() {
        assert_eq!(ledger_progress(&routine(vec![]), &HashMap::new()), 0);
        assert_eq!(server_log_progress(&routine(vec![]), &[]), 0);
    }

    #[test]
    fn zero_target_exercise_is_skipped() {
        let r = routine(vec![exercise(1, 0, 0), exercise(2, 1, 2)]);
        let mut completed = HashMap::new();
        completed.insert(1, vec![1, 2, 3]);
        completed.insert(2, vec![1, 2]);
        assert_eq!(ledger_progress(&r, &completed), 100);
    }

    #[test]
    fn progress_per_submitted_set() {
        let r = routine(vec![exercise(1, 0, 3)]);
        let mut completed = HashMap::new();

        completed.insert(1, vec![1]);
        assert_eq!(ledger_progress(&r, &completed), 33);

        completed.insert(1, vec![1, 2]);
        assert_eq!(ledger_progress(&r, &completed), 67);

        completed.insert(1, vec![1, 2, 3]);
        assert_eq!(ledger_progress(&r, &completed), 100);
    }

    #[test]
    fn extra_ledger_entries_are_clamped_to_target() {
        let r = routine(vec![exercise(1, 0, 2)]);
        let mut completed = HashMap::new();
        completed.insert(1, vec![1, 2, 5]);
        assert_eq!(ledger_progress(&r, &completed), 100);
    }

    #[test]
    fn unknown_exercise_ids_in_ledger_are_ignored() {
        let r = routine(vec![exercise(1, 0, 2)]);
        let mut completed = HashMap::new();
        completed.insert(99, vec![1, 2]);
        assert_eq!(ledger_progress(&r, &completed), 0);
    }

    #[test]
    fn full_completion_requires_every_exercise() {
        let r = routine(vec![exercise(1, 0, 2), exercise(2, 1, 1)]);
        let mut completed = HashMap::new();
        completed.insert(1, vec![1, 2]);
        assert_eq!(ledger_progress(&r, &completed), 67);

        completed.insert(2, vec![1]);
        assert_eq!(ledger_progress(&r, &completed), 100);
    }

    #[test]
    fn server_log_counts_rows_per_exercise() {
        let r = routine(vec![exercise(1, 0, 3), exercise(2, 1, 1)]);
        let records = vec![record(1, 1), record(1, 2), record(2, 1)];
        assert_eq!(server_log_progress(&r, &records), 75);
    }

    #[test]
    fn server_log_clamps_extra_rows() {
        let r = routine(vec![exercise(1, 0, 2)]);
        let records = vec![record(1, 1), record(1, 2), record(1, 3), record(1, 4)];
        assert_eq!(server_log_progress(&r, &records), 100);
    }

    #[test]
    fn server_log_tolerates_empty_input() {
        let r = routine(vec![exercise(1, 0, 3)]);
        assert_eq!(server_log_progress(&r, &[]), 0);
    }
}
