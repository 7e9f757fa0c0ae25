use crate::types::{PreloadedExercise, Routine};

/// Auto-advance logic for an active routine: given what was just
/// logged, decide what the workout form should present next.
///
/// Exercise order is `order_index` ascending; set numbers run from 1
/// regardless of which sets were ticked off out of order by hand. The
/// completion ledger is not consulted here; manual checkbox toggling
/// and form-driven advance are independent.
///
/// `None` means the routine is complete (or the reference was stale
/// and there is nothing sensible to present).

/// First exercise/set of a freshly started routine. `None` for a
/// routine with no exercises (and no runnable exercise at all when
/// every target is zero).
pub fn first_exercise(routine: &Routine) -> Option<PreloadedExercise> {
    routine
        .ordered_exercises()
        .into_iter()
        .find(|ex| ex.sets > 0)
        .map(|ex| PreloadedExercise::new(ex.clone(), 1))
}

/// Next exercise+set after `completed_set` of `exercise_id` was
/// logged. Stays on the same exercise while sets remain, moves to the
/// next exercise with a non-zero target otherwise, and returns `None`
/// when the routine is finished. An exercise id that is not in the
/// routine (stale preload after an edit) also yields `None`.
pub fn next_after(
    routine: &Routine,
    exercise_id: i64,
    completed_set: u32,
) -> Option<PreloadedExercise> {
    let ordered = routine.ordered_exercises();
    let position = ordered.iter().position(|ex| ex.exercise_id == exercise_id)?;

    let current = ordered[position];
    if completed_set < current.sets {
        return Some(PreloadedExercise::new(current.clone(), completed_set + 1));
    }

    ordered
        .into_iter()
        .skip(position + 1)
        .find(|ex| ex.sets > 0)
        .map(|ex| PreloadedExercise::new(ex.clone(), 1))
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
            reps: 8,
            weight: None,
            rest_time_seconds: 90,
            notes: None,
        }
    }

    fn routine(exercises: Vec<RoutineExercise>) -> Routine {
        Routine { id: 7, name: "Legs".into(), description: None, exercises }
    }

    #[test]
    fn starts_at_first_exercise_set_one() {
        let r = routine(vec![exercise(1, 0, 2), exercise(2, 1, 1)]);
        let first = first_exercise(&r).unwrap();
        assert_eq!(first.exercise.exercise_id, 1);
        assert_eq!(first.current_set, 1);
    }

    #[test]
    fn empty_routine_has_no_first_exercise() {
        assert_eq!(first_exercise(&routine(vec![])), None);
    }

    #[test]
    fn order_index_wins_over_storage_order() {
        let r = routine(vec![exercise(2, 1, 1), exercise(1, 0, 2)]);
        assert_eq!(first_exercise(&r).unwrap().exercise.exercise_id, 1);
    }

    #[test]
    fn cursor_walks_sets_then_exercises_then_completes() {
        // A(sets=2), B(sets=1): A/1 -> A/2 -> B/1 -> Complete
        let r = routine(vec![exercise(1, 0, 2), exercise(2, 1, 1)]);

        let after_a1 = next_after(&r, 1, 1).unwrap();
        assert_eq!((after_a1.exercise.exercise_id, after_a1.current_set), (1, 2));

        let after_a2 = next_after(&r, 1, 2).unwrap();
        assert_eq!((after_a2.exercise.exercise_id, after_a2.current_set), (2, 1));

        assert_eq!(next_after(&r, 2, 1), None);
    }

    #[test]
    fn single_exercise_three_sets() {
        let r = routine(vec![exercise(1, 0, 3)]);
        assert_eq!(next_after(&r, 1, 1).unwrap().current_set, 2);
        assert_eq!(next_after(&r, 1, 2).unwrap().current_set, 3);
        assert_eq!(next_after(&r, 1, 3), None);
    }

    #[test]
    fn zero_target_exercises_are_skipped_when_advancing() {
        let r = routine(vec![exercise(1, 0, 1), exercise(2, 1, 0), exercise(3, 2, 2)]);
        let next = next_after(&r, 1, 1).unwrap();
        assert_eq!(next.exercise.exercise_id, 3);
        assert_eq!(next.current_set, 1);

        assert_eq!(first_exercise(&routine(vec![exercise(2, 0, 0)])), None);
    }

    #[test]
    fn stale_exercise_id_degrades_to_complete() {
        let r = routine(vec![exercise(1, 0, 2)]);
        assert_eq!(next_after(&r, 99, 1), None);
    }

    #[test]
    fn logging_past_target_moves_on_instead_of_overrunning() {
        let r = routine(vec![exercise(1, 0, 2), exercise(2, 1, 1)]);
        let next = next_after(&r, 1, 5).unwrap();
        assert_eq!(next.exercise.exercise_id, 2);
    }
}
