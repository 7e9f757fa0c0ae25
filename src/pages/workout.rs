use leptos::*;

use crate::api;
use crate::events::{self, AppEvent};
use crate::ledger::CompletionLedger;
use crate::sequencer;
use crate::session;
use crate::storage;
use crate::types::{ActiveSession, PreloadedExercise, RoutineExercise};

fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[component]
pub fn WorkoutPage(
    active: RwSignal<Option<ActiveSession>>,
    preloaded: RwSignal<Option<PreloadedExercise>>,
    ledger: RwSignal<CompletionLedger>,
) -> impl IntoView {
    let (reps_input, set_reps_input) = create_signal(String::new());
    let (weight_input, set_weight_input) = create_signal(String::new());
    let (seconds_input, set_seconds_input) = create_signal(String::new());
    let (observations_input, set_observations_input) = create_signal(String::new());
    let (set_input, set_set_input) = create_signal("1".to_string());
    let (manual_exercise_id, set_manual_exercise_id) = create_signal(Option::<i64>::None);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (submitting, set_submitting) = create_signal(false);

    // Prefill targets whenever the sequencer hands over a new
    // exercise/set.
    create_effect(move |_| {
        if let Some(pre) = preloaded.get() {
            set_reps_input.set(pre.exercise.reps.to_string());
            set_weight_input.set(
                pre.exercise.weight.map(|w| w.to_string()).unwrap_or_default(),
            );
            set_seconds_input.set(pre.exercise.rest_time_seconds.to_string());
            set_set_input.set(pre.current_set.to_string());
        }
    });

    // The exercise+set the form is aimed at: the sequencer's preload
    // when there is one, otherwise the manual pick from the active
    // routine.
    let current_target = move || -> Option<(RoutineExercise, u32)> {
        if let Some(pre) = preloaded.get() {
            return Some((pre.exercise, pre.current_set));
        }
        let sess = active.get()?;
        let id = manual_exercise_id.get()?;
        let exercise = sess
            .routine
            .exercises
            .iter()
            .find(|ex| ex.exercise_id == id)?
            .clone();
        let set_number = set_input.get().trim().parse().unwrap_or(1);
        Some((exercise, set_number))
    };

    let on_submit = move |_| {
        let Some((exercise, set_number)) = current_target() else {
            set_error.set(Some("Pick an exercise first".to_string()));
            return;
        };
        let reps: u32 = match reps_input.get().trim().parse() {
            Ok(r) => r,
            Err(_) => {
                set_error.set(Some("Reps must be a number".to_string()));
                return;
            }
        };
        let weight = weight_input.get().trim().parse::<f64>().ok().filter(|w| *w > 0.0);
        let seconds = seconds_input.get().trim().parse::<u32>().ok();
        let observations = {
            let text = observations_input.get();
            if text.trim().is_empty() { None } else { Some(text) }
        };

        set_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            let request = api::CreateWorkoutRequest {
                exercise_id: exercise.exercise_id,
                reps,
                set: set_number,
                seconds,
                weight,
                observations,
            };

            match api::create_workout(&request).await {
                Ok(_) => {
                    events::dispatch(&AppEvent::SocialFeedRefresh);

                    if let Some(sess) = active.get_untracked() {
                        let today = session::today_key();

                        // Mark the set done. Re-logging an already
                        // ticked set must not undo it.
                        ledger.update(|l| {
                            if !l.is_set_completed(
                                &today,
                                sess.routine.id,
                                exercise.exercise_id,
                                set_number,
                            ) {
                                l.toggle(&today, sess.routine.id, exercise.exercise_id, set_number);
                            }
                        });
                        storage::save_ledger(&ledger.get_untracked());
                        crate::app::refresh_active_progress(
                            active,
                            &ledger.get_untracked(),
                            &today,
                            sess.routine.id,
                        );

                        match sequencer::next_after(&sess.routine, exercise.exercise_id, set_number)
                        {
                            Some(next) => preloaded.set(Some(next)),
                            None => {
                                // End of the routine. The session is
                                // kept so the banner can show the
                                // completed state until dismissed.
                                preloaded.set(None);
                                active.update(|a| {
                                    if let Some(a) = a.as_mut() {
                                        a.progress = 100;
                                    }
                                });
                                if let Some(a) = active.get_untracked() {
                                    session::persist(&a);
                                }
                            }
                        }
                    }
                    set_observations_input.set(String::new());
                }
                // Failed submission: cursor and ledger untouched, the
                // user stays on the same exercise/set with a retryable
                // message.
                Err(e) => set_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="workout-page">
            <WorkoutTimer />

            {move || match active.get() {
                None => view! {
                    <div class="workout-hint">
                        "No active routine. Start one from the Routines tab to log sets against it."
                    </div>
                }.into_view(),
                // A started routine without exercises is a dead end,
                // not a completion.
                Some(sess) if sess.routine.exercises.is_empty() => view! {
                    <div class="workout-hint">"This routine has no exercises."</div>
                }.into_view(),
                Some(sess) => {
                    let exercises = sess.routine.ordered_exercises();
                    view! {
                        <div class="workout-form">
                            {move || match preloaded.get() {
                                Some(pre) => view! {
                                    <div class="workout-target">
                                        <span class="workout-target-name">
                                            {pre.exercise.exercise_name.clone()}
                                        </span>
                                        <span class="workout-target-set">
                                            {format!("Set {} of {}", pre.current_set, pre.exercise.sets)}
                                        </span>
                                        {pre.exercise.notes.clone().map(|n| view! {
                                            <span class="workout-target-notes">{n}</span>
                                        })}
                                    </div>
                                }.into_view(),
                                None => view! {
                                    <div class="workout-manual-pick">
                                        <select on:change=move |ev| {
                                            set_manual_exercise_id.set(
                                                event_target_value(&ev).parse().ok()
                                            );
                                        }>
                                            <option value="">"Choose exercise"</option>
                                            {active.get_untracked().map(|s| {
                                                s.routine.ordered_exercises().into_iter().map(|ex| {
                                                    view! {
                                                        <option value=ex.exercise_id.to_string()>
                                                            {ex.exercise_name.clone()}
                                                        </option>
                                                    }
                                                }).collect_view()
                                            })}
                                        </select>
                                        <input
                                            type="number"
                                            class="workout-input set"
                                            placeholder="Set"
                                            prop:value=set_input
                                            on:input=move |ev| set_set_input.set(event_target_value(&ev))
                                        />
                                    </div>
                                }.into_view(),
                            }}

                            <div class="workout-fields">
                                <input
                                    type="number"
                                    class="workout-input"
                                    placeholder="Reps"
                                    prop:value=reps_input
                                    on:input=move |ev| set_reps_input.set(event_target_value(&ev))
                                />
                                <input
                                    type="number"
                                    class="workout-input"
                                    placeholder="Weight (kg)"
                                    prop:value=weight_input
                                    on:input=move |ev| set_weight_input.set(event_target_value(&ev))
                                />
                                <input
                                    type="number"
                                    class="workout-input"
                                    placeholder="Rest (s)"
                                    prop:value=seconds_input
                                    on:input=move |ev| set_seconds_input.set(event_target_value(&ev))
                                />
                                <input
                                    type="text"
                                    class="workout-input wide"
                                    placeholder="Notes"
                                    prop:value=observations_input
                                    on:input=move |ev| set_observations_input.set(event_target_value(&ev))
                                />
                            </div>

                            {move || error.get().map(|e| view! {
                                <div class="workout-error">{e}</div>
                            })}

                            <button
                                class="workout-submit"
                                on:click=on_submit
                                disabled=move || submitting.get()
                            >
                                {move || if submitting.get() { "Saving..." } else { "Log set" }}
                            </button>

                            <div class="workout-routine-overview">
                                {exercises.into_iter().map(|ex| {
                                    let name = ex.exercise_name.clone();
                                    let label = format!("{}: {}x{}", name, ex.sets, ex.reps);
                                    view! { <div class="workout-overview-row">{label}</div> }
                                }).collect_view()}
                            </div>
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum TimerMode {
    Rest,
    Series,
}

/// Rest/series stopwatch. One clock is current at a time; switching
/// modes zeroes both before the new one starts, and the stop-routine
/// broadcast resets everything.
#[component]
fn WorkoutTimer() -> impl IntoView {
    let (mode, set_mode) = create_signal(TimerMode::Rest);
    let (rest_secs, set_rest_secs) = create_signal(0u32);
    let (series_secs, set_series_secs) = create_signal(0u32);
    let (running, set_running) = create_signal(false);

    create_effect(move |_| {
        let handle = gloo_timers::callback::Interval::new(1000, move || {
            if running.get() {
                match mode.get() {
                    TimerMode::Rest => set_rest_secs.update(|t| *t += 1),
                    TimerMode::Series => set_series_secs.update(|t| *t += 1),
                }
            }
        });
        on_cleanup(move || drop(handle));
    });

    let subscription = events::subscribe(&[events::RESET_TIMER], move |_| {
        set_running.set(false);
        set_rest_secs.set(0);
        set_series_secs.set(0);
    });
    on_cleanup(move || drop(subscription));

    let switch_mode = move |next: TimerMode| {
        set_running.set(false);
        set_rest_secs.set(0);
        set_series_secs.set(0);
        set_mode.set(next);
        set_running.set(true);
    };

    view! {
        <div class="workout-timer">
            <span class=move || match mode.get() {
                TimerMode::Rest => "timer-display rest",
                TimerMode::Series => "timer-display series",
            }>
                {move || format_clock(match mode.get() {
                    TimerMode::Rest => rest_secs.get(),
                    TimerMode::Series => series_secs.get(),
                })}
            </span>

            <button
                class=move || if mode.get() == TimerMode::Rest { "timer-mode active" } else { "timer-mode" }
                on:click=move |_| switch_mode(TimerMode::Rest)
            >
                "Rest"
            </button>
            <button
                class=move || if mode.get() == TimerMode::Series { "timer-mode active" } else { "timer-mode" }
                on:click=move |_| switch_mode(TimerMode::Series)
            >
                "Series"
            </button>
            <button
                class="timer-toggle"
                on:click=move |_| set_running.update(|r| *r = !*r)
            >
                {move || if running.get() { "Stop" } else { "Start" }}
            </button>
        </div>
    }
}
