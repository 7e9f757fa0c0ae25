use leptos::*;

use crate::api;
use crate::events::{self, AppEvent};
use crate::ledger::CompletionLedger;
use crate::pages::{RoutinesPage, SocialPage, WorkoutPage};
use crate::progress;
use crate::sequencer;
use crate::session;
use crate::storage;
use crate::types::{ActiveSession, AppTab, PreloadedExercise};

#[component]
pub fn App() -> impl IntoView {
    let ledger = create_rw_signal(storage::load_ledger());
    let today = session::today_key();

    // Restore must run before anything queries the sequencer.
    let restored = session::restore_on_load(&ledger.get_untracked(), &today);
    let active = create_rw_signal(restored);
    let preloaded = create_rw_signal(Option::<PreloadedExercise>::None);
    let (tab, set_tab) = create_signal(AppTab::Workout);

    // A restored session needs two async checks: the routine may have
    // been deleted server-side (degrade to idle), and when the local
    // ledger has nothing for today the progress cache is reseeded from
    // the workouts actually recorded on the server.
    if let Some(sess) = active.get_untracked() {
        let routine = sess.routine.clone();
        let ledger_is_empty = !ledger.get_untracked().has_entries_for(&today, routine.id);
        let date = today.clone();
        spawn_local(async move {
            match api::fetch_routine(routine.id).await {
                Ok(None) => {
                    session::stop();
                    active.set(None);
                    preloaded.set(None);
                    return;
                }
                Ok(Some(_)) => {}
                Err(e) => {
                    web_sys::console::log_1(&format!("routine check failed: {:?}", e).into());
                }
            }

            if !ledger_is_empty {
                return;
            }
            match api::list_workouts_for_date(&date).await {
                Ok(records) => {
                    let seeded = progress::server_log_progress(&routine, &records);
                    if seeded > 0 {
                        active.update(|a| {
                            if let Some(a) = a.as_mut() {
                                a.progress = seeded;
                            }
                        });
                        if let Some(a) = active.get_untracked() {
                            session::persist(&a);
                        }
                    }
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("progress reseed failed: {:?}", e).into());
                }
            }
        });
    }

    let subscription = events::subscribe(&events::SESSION_SIGNALS, move |event| match event {
        AppEvent::StartRoutine(routine) => {
            let sess = session::start(routine);
            preloaded.set(sequencer::first_exercise(&sess.routine));
            active.set(Some(sess));
            set_tab.set(AppTab::Workout);
        }
        AppEvent::StartRoutineSilent(routine) => {
            let sess = session::start(routine);
            preloaded.set(sequencer::first_exercise(&sess.routine));
            active.set(Some(sess));
        }
        AppEvent::StartRoutineWithExercise { routine, exercise } => {
            let sess = session::start(routine);
            active.set(Some(sess));
            preloaded.set(Some(PreloadedExercise::new(exercise, 1)));
            set_tab.set(AppTab::Workout);
        }
        AppEvent::StopRoutine => {
            session::stop();
            active.set(None);
            preloaded.set(None);
            events::dispatch(&AppEvent::ResetTimer);
        }
        AppEvent::NavigateToWorkout => {
            set_tab.set(AppTab::Workout);
        }
        _ => {}
    });
    on_cleanup(move || drop(subscription));

    let tab_button = move |target: AppTab, label: &'static str| {
        view! {
            <button
                class=move || if tab.get() == target { "tab-button active" } else { "tab-button" }
                on:click=move |_| set_tab.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="app">
            <header class="app-header">
                <div class="app-logo">"IRONLOG"</div>
                <nav class="app-tabs">
                    {tab_button(AppTab::Workout, "Log")}
                    {tab_button(AppTab::Routines, "Routines")}
                    {tab_button(AppTab::Social, "Feed")}
                </nav>
            </header>

            {move || active.get().map(|sess| view! {
                <ActiveRoutineBar session=sess active=active preloaded=preloaded />
            })}

            <main class="app-main">
                {move || match tab.get() {
                    AppTab::Workout => view! {
                        <WorkoutPage active=active preloaded=preloaded ledger=ledger />
                    }.into_view(),
                    AppTab::Routines => view! {
                        <RoutinesPage active=active ledger=ledger />
                    }.into_view(),
                    AppTab::Social => view! { <SocialPage /> }.into_view(),
                }}
            </main>
        </div>
    }
}

/// Sticky banner for the running routine: name, live progress, stop
/// control. At 100% the session is kept on screen as completed until
/// the user dismisses it.
#[component]
fn ActiveRoutineBar(
    session: ActiveSession,
    active: RwSignal<Option<ActiveSession>>,
    preloaded: RwSignal<Option<PreloadedExercise>>,
) -> impl IntoView {
    let routine_name = session.routine.name.clone();
    let progress = session.progress;
    let completed = progress >= 100;

    let dismiss = move |_| {
        session::stop();
        active.set(None);
        preloaded.set(None);
    };

    view! {
        <div class=if completed { "routine-bar completed" } else { "routine-bar" }>
            {if completed {
                view! {
                    <span class="routine-bar-name">{format!("{} complete!", routine_name)}</span>
                    <button class="routine-bar-dismiss" on:click=dismiss>"Dismiss"</button>
                }.into_view()
            } else {
                view! {
                    <span class="routine-bar-name">{routine_name}</span>
                    <div class="routine-bar-track">
                        <div class="routine-bar-fill" style=format!("width: {}%", progress)></div>
                    </div>
                    <span class="routine-bar-percent">{format!("{}%", progress)}</span>
                    <button
                        class="routine-bar-stop"
                        on:click=move |_| events::dispatch(&AppEvent::StopRoutine)
                    >
                        "Stop"
                    </button>
                }.into_view()
            }}
        </div>
    }
}

/// Recompute and persist the active session's cached progress after a
/// ledger change for `routine_id`. No-op when the change belongs to a
/// routine that is not the active one.
pub fn refresh_active_progress(
    active: RwSignal<Option<ActiveSession>>,
    ledger: &CompletionLedger,
    today: &str,
    routine_id: i64,
) {
    let Some(sess) = active.get_untracked() else {
        return;
    };
    if sess.routine.id != routine_id {
        return;
    }
    let completed = ledger.get_for_routine(today, routine_id);
    let new_progress = progress::ledger_progress(&sess.routine, &completed);
    active.update(|a| {
        if let Some(a) = a.as_mut() {
            a.progress = new_progress;
        }
    });
    if let Some(a) = active.get_untracked() {
        session::persist(&a);
    }
}
