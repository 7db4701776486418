use crate::env_variable_utils::get_app_name;
use crate::logs::pages::{LogsPage, StatisticsPage};
use crate::models::{HistorySummary, UsageSnapshot, VideoResult};
use crate::search::api::{clear_history, fetch_history, fetch_stats, replay_history, search_videos};
use crate::search::components::{HistorySidebar, QuotaChips, ResultsGrid, SearchBar};
use crate::search::search_options::{
    SearchOptionsDropdowns, DEFAULT_MAX_RESULTS, DEFAULT_MIN_VIEW_COUNT,
};
use yew::prelude::*;
use yew_router::prelude::*;

const SIDEBAR_HISTORY_LIMIT: usize = 10;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/logs")]
    Logs,
    #[at("/statistics")]
    Statistics,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <SearchApp /> },
        Route::Logs => html! { <LogsPage /> },
        Route::Statistics => html! { <StatisticsPage /> },
        Route::NotFound => html! {
            <div class="min-h-screen flex items-center justify-center bg-gray-700">
                <div class="bg-white p-8 rounded-lg shadow-lg text-center">
                    <h1 class="text-2xl font-bold text-gray-800 mb-4">{"404 - Page Not Found"}</h1>
                    <Link<Route> to={Route::Home} classes="text-blue-600 hover:underline">
                        {"Go back to search"}
                    </Link<Route>>
                </div>
            </div>
        },
    }
}

fn update_url_params(query: &str, max_results: u32, min_view_count: u64) {
    if let Some(window) = web_sys::window() {
        let Ok(href) = window.location().href() else {
            return;
        };
        let Ok(url) = web_sys::Url::new(&href) else {
            return;
        };
        let search_params = url.search_params();
        search_params.set("q", query);
        search_params.set("max", &max_results.to_string());
        search_params.set("min", &min_view_count.to_string());

        // Update the URL without reloading the page
        if let Ok(history) = window.history() {
            let _ =
                history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url.href()));
        }
    }
}

fn get_url_param(name: &str) -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get(name).filter(|value| !value.is_empty())
}

fn refresh_sidebar(
    stats: UseStateHandle<Option<UsageSnapshot>>,
    history: UseStateHandle<Vec<HistorySummary>>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        match fetch_stats().await {
            Ok(snapshot) => stats.set(Some(snapshot)),
            Err(e) => log::error!("Failed to load usage stats: {e}"),
        }
        match fetch_history(SIDEBAR_HISTORY_LIMIT).await {
            Ok(entries) => history.set(entries),
            Err(e) => log::error!("Failed to load search history: {e}"),
        }
    });
}

#[function_component(SearchApp)]
pub fn search_app() -> Html {
    let search_query = use_state(|| get_url_param("q").unwrap_or_default());
    let search_results = use_state(Vec::<VideoResult>::default);
    let loading = use_state(|| false);
    let searched = use_state(|| false);
    let error_message = use_state(Option::<String>::default);
    let info_message = use_state(Option::<String>::default);
    let stats = use_state(|| None::<UsageSnapshot>);
    let history = use_state(Vec::<HistorySummary>::default);
    let max_results = use_state(|| {
        get_url_param("max")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS)
    });
    let min_view_count = use_state(|| {
        get_url_param("min")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_VIEW_COUNT)
    });

    let execute_current_search = {
        let search_query = search_query.clone();
        let search_results = search_results.clone();
        let loading = loading.clone();
        let searched = searched.clone();
        let error_message = error_message.clone();
        let info_message = info_message.clone();
        let stats = stats.clone();
        let history = history.clone();
        let max_results = max_results.clone();
        let min_view_count = min_view_count.clone();

        move |query: String| {
            let query = query.trim().to_string();
            if query.is_empty() {
                error_message.set(Some("Please enter a search keyword".to_string()));
                return;
            }

            let search_results = search_results.clone();
            let loading = loading.clone();
            let error_message = error_message.clone();
            let info_message = info_message.clone();
            let stats = stats.clone();
            let history = history.clone();
            let max = *max_results;
            let min = *min_view_count;

            search_query.set(query.clone());
            searched.set(true);
            loading.set(true);
            error_message.set(None);
            info_message.set(None);
            update_url_params(&query, max, min);

            wasm_bindgen_futures::spawn_local(async move {
                match search_videos(&query, max, min).await {
                    Ok(response) => {
                        if let Some(log_info) = &response.log_info {
                            log::info!(
                                "Search \"{query}\": {} fetched, {} kept, {} + {} API calls",
                                log_info.raw_count,
                                log_info.filtered_count,
                                log_info.search_requests,
                                log_info.video_requests
                            );
                        }
                        info_message.set(Some(response.message));
                        search_results.set(response.data);
                    }
                    Err(e) => {
                        if e.quota_exceeded {
                            log::warn!("Quota exhausted: {e}");
                        }
                        search_results.set(Vec::new());
                        error_message.set(Some(e.message));
                    }
                }
                loading.set(false);
                refresh_sidebar(stats, history);
            });
        }
    };

    // Effect for initial load
    {
        let stats = stats.clone();
        let history = history.clone();
        let execute_search_fn = execute_current_search.clone();

        use_effect_with((), move |_| {
            refresh_sidebar(stats, history);
            if let Some(query) = get_url_param("q") {
                execute_search_fn(query);
            }
            || ()
        });
    }

    let on_search = {
        let execute_search_fn = execute_current_search.clone();
        Callback::from(move |query: String| execute_search_fn(query))
    };

    // Replays never hit the YouTube API; a vanished entry falls back to a fresh search.
    let on_history_select = {
        let search_query = search_query.clone();
        let search_results = search_results.clone();
        let loading = loading.clone();
        let searched = searched.clone();
        let error_message = error_message.clone();
        let info_message = info_message.clone();
        let execute_search_fn = execute_current_search.clone();

        Callback::from(move |entry: HistorySummary| {
            let search_results = search_results.clone();
            let loading = loading.clone();
            let error_message = error_message.clone();
            let info_message = info_message.clone();
            let execute_search_fn = execute_search_fn.clone();

            search_query.set(entry.query.clone());
            searched.set(true);
            loading.set(true);
            error_message.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match replay_history(&entry.id, &entry.query).await {
                    Ok(replay) => {
                        info_message.set(Some(replay.message));
                        search_results.set(replay.data);
                        loading.set(false);
                    }
                    Err(e) if e.is_not_found() => {
                        loading.set(false);
                        info_message.set(Some(
                            "History entry no longer exists, searching again...".to_string(),
                        ));
                        execute_search_fn(entry.query);
                    }
                    Err(e) => {
                        loading.set(false);
                        error_message.set(Some(e.message));
                    }
                }
            });
        })
    };

    let on_clear_history = {
        let history = history.clone();
        let error_message = error_message.clone();
        Callback::from(move |_: ()| {
            let history = history.clone();
            let error_message = error_message.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match clear_history().await {
                    Ok(()) => history.set(Vec::new()),
                    Err(e) => error_message.set(Some(format!("Failed to clear history: {e}"))),
                }
            });
        })
    };

    let on_max_results_change = {
        let max_results = max_results.clone();
        Callback::from(move |value: u32| max_results.set(value))
    };

    let on_min_view_count_change = {
        let min_view_count = min_view_count.clone();
        Callback::from(move |value: u64| min_view_count.set(value))
    };

    html! {
        <div class="min-h-screen flex flex-col md:flex-row items-start gap-4 bg-gray-700 p-4">
            <HistorySidebar
                entries={(*history).clone()}
                on_select={on_history_select}
                on_clear={on_clear_history}
            />

            <div class="bg-white p-8 rounded-lg shadow-lg w-full">
                <h1 class="text-3xl font-bold text-center text-gray-800 mb-2">
                    { get_app_name() }
                </h1>
                <p class="text-center text-gray-600 mb-4">
                    {"Search YouTube and keep only the most viewed videos"}
                </p>

                <QuotaChips stats={(*stats).clone()} />

                <SearchBar
                    query={(*search_query).clone()}
                    loading={*loading}
                    on_search={on_search}
                />

                <SearchOptionsDropdowns
                    max_results={*max_results}
                    min_view_count={*min_view_count}
                    on_max_results_change={on_max_results_change}
                    on_min_view_count_change={on_min_view_count_change}
                />

                {
                    if let Some(msg) = &*error_message {
                        html! {
                            <p class="text-red-600 text-center mb-4">{ format!("Error: {msg}") }</p>
                        }
                    } else if let Some(msg) = &*info_message {
                        html! {
                            <p class="text-green-700 text-center mb-4">{ msg }</p>
                        }
                    } else {
                        html! {}
                    }
                }

                <ResultsGrid
                    results={(*search_results).clone()}
                    loading={*loading}
                    searched={*searched}
                    error={(*error_message).clone()}
                />
            </div>
        </div>
    }
}
