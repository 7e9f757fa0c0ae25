use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event};

use crate::types::{Routine, RoutineExercise};

/// Broadcast signals between UI surfaces that are not in a
/// parent/child relationship (routine cards, detail dialog, workout
/// form). Carried as window `CustomEvent`s with the serialized
/// `AppEvent` as detail, one DOM event name per signal so a handler
/// only wakes for what it subscribed to.
///
/// Listeners must unregister on teardown; `EventSubscription` does
/// that on drop, so holding it in `on_cleanup` is enough.

pub const START_ROUTINE: &str = "ironlog-start-routine";
pub const START_ROUTINE_SILENT: &str = "ironlog-start-routine-silent";
pub const START_ROUTINE_WITH_EXERCISE: &str = "ironlog-start-routine-with-exercise";
pub const STOP_ROUTINE: &str = "ironlog-stop-routine";
pub const NAVIGATE_TO_WORKOUT: &str = "ironlog-navigate-to-workout";
pub const RESET_TIMER: &str = "ironlog-reset-timer";
pub const SOCIAL_FEED_REFRESH: &str = "ironlog-social-feed-refresh";

/// The signals the application shell routes to session state changes.
pub const SESSION_SIGNALS: [&str; 5] = [
    START_ROUTINE,
    START_ROUTINE_SILENT,
    START_ROUTINE_WITH_EXERCISE,
    STOP_ROUTINE,
    NAVIGATE_TO_WORKOUT,
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "signal", content = "payload")]
pub enum AppEvent {
    StartRoutine(Routine),
    StartRoutineSilent(Routine),
    StartRoutineWithExercise { routine: Routine, exercise: RoutineExercise },
    StopRoutine,
    NavigateToWorkout,
    ResetTimer,
    SocialFeedRefresh,
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::StartRoutine(_) => START_ROUTINE,
            AppEvent::StartRoutineSilent(_) => START_ROUTINE_SILENT,
            AppEvent::StartRoutineWithExercise { .. } => START_ROUTINE_WITH_EXERCISE,
            AppEvent::StopRoutine => STOP_ROUTINE,
            AppEvent::NavigateToWorkout => NAVIGATE_TO_WORKOUT,
            AppEvent::ResetTimer => RESET_TIMER,
            AppEvent::SocialFeedRefresh => SOCIAL_FEED_REFRESH,
        }
    }
}

pub fn dispatch(event: &AppEvent) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(json) = serde_json::to_string(event) else {
        return;
    };

    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&json));
    if let Ok(custom) = CustomEvent::new_with_event_init_dict(event.name(), &init) {
        let _ = window.dispatch_event(&custom);
    }
}

/// Active listener registration. Dropping it removes the underlying
/// DOM listeners, so a remounted component never handles twice.
pub struct EventSubscription {
    names: Vec<&'static str>,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            for name in &self.names {
                let _ = window
                    .remove_event_listener_with_callback(name, self.closure.as_ref().unchecked_ref());
            }
        }
    }
}

/// Register one handler for a set of signal names. The handler gets
/// the decoded `AppEvent`; undecodable details are logged and skipped.
pub fn subscribe<F>(names: &[&'static str], mut handler: F) -> EventSubscription
where
    F: FnMut(AppEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(custom) = event.dyn_ref::<CustomEvent>() else {
            return;
        };
        let Some(json) = custom.detail().as_string() else {
            return;
        };
        match serde_json::from_str::<AppEvent>(&json) {
            Ok(app_event) => handler(app_event),
            Err(e) => {
                web_sys::console::error_1(&format!("undecodable app event: {e}").into());
            }
        }
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        for name in names {
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }

    EventSubscription { names: names.to_vec(), closure }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine() -> Routine {
        Routine { id: 3, name: "Upper".into(), description: None, exercises: vec![] }
    }

    #[test]
    fn every_signal_has_a_distinct_name() {
        let names = [
            START_ROUTINE,
            START_ROUTINE_SILENT,
            START_ROUTINE_WITH_EXERCISE,
            STOP_ROUTINE,
            NAVIGATE_TO_WORKOUT,
            RESET_TIMER,
            SOCIAL_FEED_REFRESH,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn payloads_round_trip_through_json() {
        let events = vec![
            AppEvent::StartRoutine(routine()),
            AppEvent::StartRoutineSilent(routine()),
            AppEvent::StopRoutine,
            AppEvent::ResetTimer,
            AppEvent::SocialFeedRefresh,
        ];
        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            let back: AppEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn session_signals_exclude_timer_and_feed() {
        assert!(!SESSION_SIGNALS.contains(&RESET_TIMER));
        assert!(!SESSION_SIGNALS.contains(&SOCIAL_FEED_REFRESH));
    }
}
