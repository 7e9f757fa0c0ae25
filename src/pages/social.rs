use leptos::*;

use crate::api;
use crate::events;

/// Feed of peers' logged sets. Reloads whenever the refresh broadcast
/// fires (after any workout create/delete elsewhere in the app).
#[component]
pub fn SocialPage() -> impl IntoView {
    let (entries, set_entries) = create_signal(Vec::<api::SocialEntry>::new());
    let (loading, set_loading) = create_signal(true);

    let load = move || {
        spawn_local(async move {
            match api::fetch_social_feed().await {
                Ok(rows) => set_entries.set(rows),
                Err(e) => {
                    web_sys::console::log_1(&format!("feed load failed: {:?}", e).into());
                }
            }
            set_loading.set(false);
        });
    };
    load();

    let subscription = events::subscribe(&[events::SOCIAL_FEED_REFRESH], move |_| load());
    on_cleanup(move || drop(subscription));

    view! {
        <div class="social-page">
            {move || loading.get().then(|| view! { <div class="loading">"Loading feed..."</div> })}

            {move || {
                let rows = entries.get();
                if rows.is_empty() && !loading.get() {
                    view! { <div class="social-empty">"Nothing here yet."</div> }.into_view()
                } else {
                    rows.into_iter().map(|entry| {
                        let weight = entry.weight
                            .map(|w| format!(" @ {w} kg"))
                            .unwrap_or_default();
                        let line = format!(
                            "{}: {} set {} ({} reps{})",
                            entry.user_name, entry.exercise_name, entry.set, entry.reps, weight,
                        );
                        view! {
                            <div class="social-entry">
                                <span class="social-line">{line}</span>
                                <span class="social-date">{entry.date.clone()}</span>
                            </div>
                        }
                    }).collect_view().into_view()
                }
            }}
        </div>
    }
}
