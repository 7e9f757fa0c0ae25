use crate::ledger::CompletionLedger;
use crate::progress;
use crate::storage;
use crate::types::{ActiveSession, Routine};

/// A persisted session older than this is discarded on the next read.
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

impl ActiveSession {
    pub fn new(routine: Routine, now_ms: i64) -> Self {
        Self { routine, progress: 0, is_paused: false, started_at_ms: now_ms }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.started_at_ms >= SESSION_TTL_MS
    }
}

/// Decide what a loaded session record restores to. Expired records
/// restore to nothing. The persisted percentage is only a display
/// cache: a surviving record gets its progress recomputed from the
/// ledger for today.
pub fn restore_from_record(
    record: ActiveSession,
    now_ms: i64,
    ledger: &CompletionLedger,
    today: &str,
) -> Option<ActiveSession> {
    if record.is_expired(now_ms) {
        return None;
    }
    let completed = ledger.get_for_routine(today, record.routine.id);
    let progress = progress::ledger_progress(&record.routine, &completed);
    Some(ActiveSession { progress, ..record })
}

/// Start a routine: fresh session, persisted immediately. Whether the
/// start also navigates to the workout tab is the caller's concern
/// (the silent variant differs only there).
pub fn start(routine: Routine) -> ActiveSession {
    let session = ActiveSession::new(routine, js_sys::Date::now() as i64);
    storage::save_active_session(&session);
    session
}

/// Re-persist the session after its cached progress changed.
pub fn persist(session: &ActiveSession) {
    storage::save_active_session(session);
}

pub fn stop() {
    storage::clear_active_session();
}

/// Called once at application start, before anything queries the
/// sequencer. Expired or unreadable records are cleared from storage.
pub fn restore_on_load(ledger: &CompletionLedger, today: &str) -> Option<ActiveSession> {
    let record = storage::load_active_session()?;
    let restored = restore_from_record(record, js_sys::Date::now() as i64, ledger, today);
    if restored.is_none() {
        storage::clear_active_session();
    }
    restored
}

/// Day key for the completion ledger, `YYYY-MM-DD`.
pub fn today_key() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoutineExercise;

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const TODAY: &str = "2024-01-01";

    fn routine() -> Routine {
        Routine {
            id: 7,
            name: "Pull day".into(),
            description: None,
            exercises: vec![RoutineExercise {
                exercise_id: 1,
                exercise_name: "Rows".into(),
                order_index: 0,
                sets: 2,
                reps: 10,
                weight: None,
                rest_time_seconds: 60,
                notes: None,
            }],
        }
    }

    #[test]
    fn new_session_starts_unpaused_at_zero() {
        let session = ActiveSession::new(routine(), 1000);
        assert_eq!(session.progress, 0);
        assert!(!session.is_paused);
        assert_eq!(session.started_at_ms, 1000);
    }

    #[test]
    fn expires_at_exactly_24_hours() {
        let session = ActiveSession::new(routine(), 0);
        assert!(!session.is_expired(SESSION_TTL_MS - 1));
        assert!(session.is_expired(SESSION_TTL_MS));
    }

    #[test]
    fn restore_discards_a_25_hour_old_record() {
        let record = ActiveSession::new(routine(), 0);
        let ledger = CompletionLedger::default();
        assert_eq!(restore_from_record(record, 25 * HOUR_MS, &ledger, TODAY), None);
    }

    #[test]
    fn restore_recomputes_progress_from_ledger_not_cache() {
        let mut record = ActiveSession::new(routine(), 0);
        record.progress = 80; // stale cached percentage

        let mut ledger = CompletionLedger::default();
        ledger.toggle(TODAY, 7, 1, 1);

        let restored = restore_from_record(record, HOUR_MS, &ledger, TODAY).unwrap();
        assert_eq!(restored.progress, 50);
    }

    #[test]
    fn restore_with_empty_ledger_is_zero_percent() {
        let mut record = ActiveSession::new(routine(), 0);
        record.progress = 100;
        let ledger = CompletionLedger::default();

        let restored = restore_from_record(record, HOUR_MS, &ledger, TODAY).unwrap();
        assert_eq!(restored.progress, 0);
    }

    #[test]
    fn restore_keeps_the_paused_flag() {
        let mut record = ActiveSession::new(routine(), 0);
        record.is_paused = true;
        let ledger = CompletionLedger::default();

        let restored = restore_from_record(record, HOUR_MS, &ledger, TODAY).unwrap();
        assert!(restored.is_paused);
    }
}
