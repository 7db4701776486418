use crate::logs::api::{clear_logs, fetch_log_statistics, fetch_logs};
use crate::models::{LogEntry, LogStatistics};
use crate::router::Route;
use crate::utils::{format_number, format_view_count};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

const LOG_PAGE_LIMIT: usize = 100;

fn spawn_load_logs(
    query: String,
    logs: UseStateHandle<Vec<LogEntry>>,
    loading: UseStateHandle<bool>,
    error_message: UseStateHandle<Option<String>>,
) {
    loading.set(true);
    wasm_bindgen_futures::spawn_local(async move {
        match fetch_logs(LOG_PAGE_LIMIT, &query).await {
            Ok(entries) => {
                logs.set(entries);
                error_message.set(None);
            }
            Err(e) => error_message.set(Some(format!("Failed to load logs: {}", e))),
        }
        loading.set(false);
    });
}

#[function_component(LogsPage)]
pub fn logs_page() -> Html {
    let logs = use_state(Vec::<LogEntry>::new);
    let loading = use_state(|| false);
    let error_message = use_state(|| None::<String>);
    let filter = use_state(String::new);

    // Load logs on component mount
    {
        let logs = logs.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        use_effect_with((), move |_| {
            spawn_load_logs(String::new(), logs, loading, error_message);
            || ()
        });
    }

    let on_filter_input = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input_value = e.target_unchecked_into::<HtmlInputElement>().value();
            filter.set(input_value);
        })
    };

    let on_filter_submit = {
        let filter = filter.clone();
        let logs = logs.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        Callback::from(move |e: web_sys::SubmitEvent| {
            e.prevent_default();
            spawn_load_logs(
                (*filter).clone(),
                logs.clone(),
                loading.clone(),
                error_message.clone(),
            );
        })
    };

    let on_clear = {
        let logs = logs.clone();
        let error_message = error_message.clone();
        Callback::from(move |_: MouseEvent| {
            let logs = logs.clone();
            let error_message = error_message.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match clear_logs().await {
                    Ok(()) => logs.set(Vec::new()),
                    Err(e) => error_message.set(Some(format!("Failed to clear logs: {}", e))),
                }
            });
        })
    };

    html! {
        <div class="min-h-screen bg-gray-700 p-4">
            <div class="bg-white p-8 rounded-lg shadow-lg max-w-5xl mx-auto">
                <div class="flex items-center justify-between mb-6">
                    <h1 class="text-2xl font-bold text-gray-800">{"Search request log"}</h1>
                    <div class="flex gap-4 text-sm">
                        <Link<Route> to={Route::Home} classes="text-blue-600 hover:underline">{"Search"}</Link<Route>>
                        <Link<Route> to={Route::Statistics} classes="text-blue-600 hover:underline">{"Statistics"}</Link<Route>>
                    </div>
                </div>

                <form onsubmit={on_filter_submit} class="flex mb-4">
                    <input
                        type="text"
                        class="flex-grow p-2 border border-gray-300 rounded-l-lg"
                        placeholder="Filter by query..."
                        value={(*filter).clone()}
                        oninput={on_filter_input}
                    />
                    <button type="submit" class="bg-blue-600 text-white px-4 rounded-r-lg hover:bg-blue-700">
                        {"Filter"}
                    </button>
                    <button type="button" onclick={on_clear} class="ml-4 text-red-600 hover:underline">
                        {"Clear log"}
                    </button>
                </form>

                {
                    if let Some(msg) = &*error_message {
                        html! { <p class="text-red-600 mb-4">{ msg }</p> }
                    } else {
                        html! {}
                    }
                }

                {
                    if *loading {
                        html! { <p class="text-gray-500">{"Loading..."}</p> }
                    } else if logs.is_empty() {
                        html! { <p class="text-gray-500">{"No log entries"}</p> }
                    } else {
                        html! {
                            <table class="w-full text-sm">
                                <thead>
                                    <tr class="text-left border-b">
                                        <th>{"Time"}</th>
                                        <th>{"Query"}</th>
                                        <th>{"Filter"}</th>
                                        <th>{"API calls"}</th>
                                        <th>{"Raw / kept"}</th>
                                        <th>{"Top video"}</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    { for logs.iter().map(log_row) }
                                </tbody>
                            </table>
                        }
                    }
                }
            </div>
        </div>
    }
}

fn log_row(entry: &LogEntry) -> Html {
    let calls = &entry.api_requests;
    let pagination = if calls.used_pagination { " (paged)" } else { "" };
    let top_video = entry
        .result_details
        .top_video
        .as_ref()
        .map(|top| format!("{} ({})", top.title, format_view_count(top.view_count)))
        .unwrap_or_else(|| "-".to_string());

    html! {
        <tr key={entry.id.clone()} class="border-b align-top">
            <td class="py-1">{ format!("{} {}", entry.date, entry.time) }</td>
            <td>
                { &entry.search.query }
                {
                    if entry.source == "history" {
                        html! { <span class="ml-1 text-xs text-gray-500">{"(history)"}</span> }
                    } else {
                        html! {}
                    }
                }
            </td>
            <td>{ &entry.results.filter_criteria.description }</td>
            <td>{ format!("{} search + {} videos{}", calls.search_requests, calls.video_requests, pagination) }</td>
            <td>{ format!("{} / {}", entry.results.raw_count, entry.results.filtered_count) }</td>
            <td>{ top_video }</td>
        </tr>
    }
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    label: AttrValue,
    value: String,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-gray-100 rounded-lg p-4 text-center">
            <p class="text-2xl font-bold text-gray-800">{ &props.value }</p>
            <p class="text-sm text-gray-600">{ props.label.clone() }</p>
        </div>
    }
}

#[function_component(StatisticsPage)]
pub fn statistics_page() -> Html {
    let statistics = use_state(|| None::<LogStatistics>);
    let error_message = use_state(|| None::<String>);

    {
        let statistics = statistics.clone();
        let error_message = error_message.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_log_statistics().await {
                    Ok(stats) => statistics.set(Some(stats)),
                    Err(e) => error_message.set(Some(format!("Failed to load statistics: {}", e))),
                }
            });
            || ()
        });
    }

    let body = match (&*statistics, &*error_message) {
        (_, Some(msg)) => html! { <p class="text-red-600">{ msg }</p> },
        (None, None) => html! { <p class="text-gray-500">{"Loading..."}</p> },
        (Some(stats), None) => {
            let summary = &stats.summary;
            html! {
                <>
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-8">
                        <StatCard label="Searches" value={format_number(summary.total_searches as u64)} />
                        <StatCard label="Searches today" value={format_number(summary.today_searches as u64)} />
                        <StatCard label="API calls" value={format_number(summary.total_api_requests)} />
                        <StatCard label="API calls today" value={format_number(summary.today_api_requests)} />
                        <StatCard label="Videos fetched" value={format_number(summary.total_raw_results)} />
                        <StatCard label="Videos kept" value={format_number(summary.total_filtered_results)} />
                        <StatCard label="Paged searches" value={format_number(summary.pagination_used as u64)} />
                        <StatCard label="Filter rate" value={summary.filter_rate.clone()} />
                    </div>

                    <h2 class="text-lg font-bold text-gray-800 mb-2">{"Top queries"}</h2>
                    {
                        if stats.top_queries.is_empty() {
                            html! { <p class="text-gray-500">{"No searches yet"}</p> }
                        } else {
                            html! {
                                <ol class="list-decimal ml-6">
                                    { for stats.top_queries.iter().map(|q| html! {
                                        <li key={q.query.clone()}>{ format!("{} ({})", q.query, q.count) }</li>
                                    })}
                                </ol>
                            }
                        }
                    }
                </>
            }
        }
    };

    html! {
        <div class="min-h-screen bg-gray-700 p-4">
            <div class="bg-white p-8 rounded-lg shadow-lg max-w-5xl mx-auto">
                <div class="flex items-center justify-between mb-6">
                    <h1 class="text-2xl font-bold text-gray-800">{"Search statistics"}</h1>
                    <div class="flex gap-4 text-sm">
                        <Link<Route> to={Route::Home} classes="text-blue-600 hover:underline">{"Search"}</Link<Route>>
                        <Link<Route> to={Route::Logs} classes="text-blue-600 hover:underline">{"Logs"}</Link<Route>>
                    </div>
                </div>
                { body }
            </div>
        </div>
    }
}
