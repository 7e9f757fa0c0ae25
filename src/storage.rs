use crate::ledger::CompletionLedger;
use crate::types::ActiveSession;

const ACTIVE_ROUTINE_KEY: &str = "ironlog_active_routine";
const COMPLETED_SETS_KEY: &str = "ironlog_completed_sets";

pub fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

// Active routine session. Reads fail open: a missing key, unavailable
// storage or malformed JSON all come back as "no active routine".

pub fn save_active_session(session: &ActiveSession) {
    if let Some(storage) = get_local_storage() {
        if let Ok(json) = serde_json::to_string(session) {
            let _ = storage.set_item(ACTIVE_ROUTINE_KEY, &json);
        }
    }
}

pub fn load_active_session() -> Option<ActiveSession> {
    let storage = get_local_storage()?;
    let json = storage.get_item(ACTIVE_ROUTINE_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(session) => Some(session),
        Err(e) => {
            web_sys::console::error_1(&format!("discarding bad active session: {e}").into());
            let _ = storage.remove_item(ACTIVE_ROUTINE_KEY);
            None
        }
    }
}

pub fn clear_active_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(ACTIVE_ROUTINE_KEY);
    }
}

// Completion ledger, persisted as one JSON blob synchronously after
// every toggle.

pub fn save_ledger(ledger: &CompletionLedger) {
    if let Some(storage) = get_local_storage() {
        if let Ok(json) = serde_json::to_string(ledger) {
            let _ = storage.set_item(COMPLETED_SETS_KEY, &json);
        }
    }
}

pub fn load_ledger() -> CompletionLedger {
    let storage = match get_local_storage() {
        Some(s) => s,
        None => return CompletionLedger::default(),
    };

    let json = match storage.get_item(COMPLETED_SETS_KEY) {
        Ok(Some(j)) => j,
        _ => return CompletionLedger::default(),
    };

    match serde_json::from_str(&json) {
        Ok(ledger) => ledger,
        Err(e) => {
            web_sys::console::error_1(&format!("discarding bad ledger: {e}").into());
            CompletionLedger::default()
        }
    }
}
