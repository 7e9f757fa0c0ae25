use leptos::*;

use crate::api;
use crate::events::{self, AppEvent};
use crate::ledger::CompletionLedger;
use crate::progress;
use crate::session;
use crate::storage;
use crate::types::{ActiveSession, Routine};

#[component]
pub fn RoutinesPage(
    active: RwSignal<Option<ActiveSession>>,
    ledger: RwSignal<CompletionLedger>,
) -> impl IntoView {
    let (routines, set_routines) = create_signal(Vec::<Routine>::new());
    let (loading, set_loading) = create_signal(true);
    let (load_error, set_load_error) = create_signal(Option::<String>::None);
    let (selected, set_selected) = create_signal(Option::<Routine>::None);

    spawn_local(async move {
        match api::fetch_routines().await {
            Ok(list) => set_routines.set(list),
            Err(e) => {
                web_sys::console::log_1(&format!("routine fetch failed: {:?}", e).into());
                set_load_error.set(Some("Could not load routines".to_string()));
            }
        }
        set_loading.set(false);
    });

    let is_active = move |routine_id: i64| {
        active.get().map(|s| s.routine.id == routine_id).unwrap_or(false)
    };

    // Live ledger-based progress for the card's bar.
    let progress_of = move |routine: &Routine| -> u8 {
        let today = session::today_key();
        let completed = ledger.with(|l| l.get_for_routine(&today, routine.id));
        progress::ledger_progress(routine, &completed)
    };

    view! {
        <div class="routines-page">
            {move || loading.get().then(|| view! { <div class="loading">"Loading routines..."</div> })}
            {move || load_error.get().map(|e| view! { <div class="load-error">{e}</div> })}

            {move || {
                routines.get().into_iter().map(|routine| {
                    let routine_for_start = routine.clone();
                    let routine_for_detail = routine.clone();
                    let routine_for_bar = routine.clone();
                    let routine_id = routine.id;
                    let exercise_count = routine.exercises.len();

                    view! {
                        <div class="routine-card">
                            <div class="routine-card-header">
                                <span class="routine-card-name">{routine.name.clone()}</span>
                                <span class="routine-card-count">
                                    {format!("{} exercises", exercise_count)}
                                </span>
                            </div>
                            {routine.description.clone().map(|d| view! {
                                <div class="routine-card-description">{d}</div>
                            })}

                            {move || is_active(routine_id).then(|| {
                                let percent = progress_of(&routine_for_bar);
                                view! {
                                    <div class="routine-card-progress">
                                        <div class="routine-bar-track">
                                            <div
                                                class="routine-bar-fill"
                                                style=format!("width: {}%", percent)
                                            ></div>
                                        </div>
                                        <span>{format!("{}%", percent)}</span>
                                    </div>
                                }
                            })}

                            <div class="routine-card-actions">
                                {move || if is_active(routine_id) {
                                    view! {
                                        <button
                                            class="routine-stop-btn"
                                            on:click=move |_| events::dispatch(&AppEvent::StopRoutine)
                                        >
                                            "Stop"
                                        </button>
                                    }.into_view()
                                } else {
                                    let routine = routine_for_start.clone();
                                    view! {
                                        <button
                                            class="routine-start-btn"
                                            on:click=move |_| {
                                                events::dispatch(&AppEvent::StartRoutine(routine.clone()))
                                            }
                                        >
                                            "Start"
                                        </button>
                                    }.into_view()
                                }}
                                <button
                                    class="routine-detail-btn"
                                    on:click=move |_| set_selected.set(Some(routine_for_detail.clone()))
                                >
                                    "Details"
                                </button>
                            </div>
                        </div>
                    }
                }).collect_view()
            }}

            {move || selected.get().map(|routine| view! {
                <RoutineDetail
                    routine=routine
                    active=active
                    ledger=ledger
                    on_close=move |_| set_selected.set(None)
                />
            })}
        </div>
    }
}

/// Detail dialog: per-set checkboxes bound to the completion ledger,
/// plus the start controls that do not live on the card (silent start,
/// start from a specific exercise).
#[component]
fn RoutineDetail(
    routine: Routine,
    active: RwSignal<Option<ActiveSession>>,
    ledger: RwSignal<CompletionLedger>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let routine_id = routine.id;
    let routine_for_silent = routine.clone();

    let toggle_set = move |exercise_id: i64, set_number: u32| {
        let today = session::today_key();
        ledger.update(|l| l.toggle(&today, routine_id, exercise_id, set_number));
        storage::save_ledger(&ledger.get_untracked());
        crate::app::refresh_active_progress(active, &ledger.get_untracked(), &today, routine_id);
    };

    let exercise_rows = routine
        .ordered_exercises()
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let routine_for_rows = routine.clone();

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.call(())>
            <div class="routine-detail" on:click=|e| e.stop_propagation()>
                <div class="routine-detail-header">
                    <span class="routine-detail-name">{routine.name.clone()}</span>
                    <button class="routine-detail-close" on:click=move |_| on_close.call(())>
                        "✕"
                    </button>
                </div>

                <div class="routine-detail-list">
                    {exercise_rows.into_iter().map(|exercise| {
                        let exercise_id = exercise.exercise_id;
                        let name = exercise.exercise_name.clone();
                        let target = format!("{}x{}", exercise.sets, exercise.reps);
                        let rest = format!("{}s rest", exercise.rest_time_seconds);
                        let routine_for_here = routine_for_rows.clone();
                        let exercise_for_here = exercise.clone();

                        view! {
                            <div class="routine-detail-row">
                                <div class="routine-detail-exercise">
                                    <span class="exercise-name">{name}</span>
                                    <span class="exercise-target">{target}</span>
                                    <span class="exercise-rest">{rest}</span>
                                </div>
                                <div class="routine-detail-sets">
                                    {(1..=exercise.sets).map(|set_number| {
                                        view! {
                                            <input
                                                type="checkbox"
                                                prop:checked=move || {
                                                    let today = session::today_key();
                                                    ledger.with(|l| l.is_set_completed(
                                                        &today, routine_id, exercise_id, set_number,
                                                    ))
                                                }
                                                on:change=move |_| toggle_set(exercise_id, set_number)
                                            />
                                        }
                                    }).collect_view()}
                                </div>
                                <button
                                    class="routine-start-here-btn"
                                    on:click=move |_| {
                                        events::dispatch(&AppEvent::StartRoutineWithExercise {
                                            routine: routine_for_here.clone(),
                                            exercise: exercise_for_here.clone(),
                                        });
                                    }
                                >
                                    "Start here"
                                </button>
                            </div>
                        }
                    }).collect_view()}
                </div>

                <div class="routine-detail-actions">
                    <button
                        class="routine-start-btn"
                        on:click=move |_| {
                            events::dispatch(&AppEvent::StartRoutineSilent(
                                routine_for_silent.clone(),
                            ));
                        }
                    >
                        "Start routine"
                    </button>
                    <button
                        class="routine-clear-btn"
                        on:click=move |_| {
                            let today = session::today_key();
                            ledger.update(|l| l.reset_for_date(&today));
                            storage::save_ledger(&ledger.get_untracked());
                            crate::app::refresh_active_progress(
                                active, &ledger.get_untracked(), &today, routine_id,
                            );
                        }
                    >
                        "Clear today"
                    </button>
                </div>
            </div>
        </div>
    }
}
