use serde::{Deserialize, Serialize};

/// One exercise row inside a routine template.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub order_index: u32,
    pub sets: u32,
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    pub rest_time_seconds: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
}

impl Routine {
    /// Exercises in presentation order: `order_index` ascending.
    pub fn ordered_exercises(&self) -> Vec<&RoutineExercise> {
        let mut exercises: Vec<&RoutineExercise> = self.exercises.iter().collect();
        exercises.sort_by_key(|ex| ex.order_index);
        exercises
    }
}

/// A server-recorded workout row. Only the fields the progress
/// calculation and the feed need; the backend stores more.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: i64,
    pub exercise_id: i64,
    #[serde(default)]
    pub exercise_name: Option<String>,
    pub reps: u32,
    pub set: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub seconds: Option<u32>,
    #[serde(default)]
    pub observations: Option<String>,
    pub date: String,
}

/// The exercise+set the workout form should default to right now.
/// Derived by the sequencer, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct PreloadedExercise {
    pub exercise: RoutineExercise,
    pub current_set: u32,
}

impl PreloadedExercise {
    pub fn new(exercise: RoutineExercise, current_set: u32) -> Self {
        Self { exercise, current_set }
    }
}

/// Persisted record of the routine the user is currently executing.
/// `progress` is a display cache; the completion ledger is the source
/// of truth and progress is recomputed from it on restore.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActiveSession {
    pub routine: Routine,
    pub progress: u8,
    pub is_paused: bool,
    pub started_at_ms: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppTab {
    Workout,
    Routines,
    Social,
}
