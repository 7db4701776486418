use crate::models::{HistorySummary, UsageSnapshot, VideoResult};
use crate::router::Route;
use crate::utils::{format_iso8601_date, format_iso8601_datetime, format_number, format_view_count};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
    pub query: String,
    pub loading: bool,
    pub on_search: Callback<String>,
}

#[function_component(SearchBar)]
pub fn search_bar(props: &SearchBarProps) -> Html {
    let current_input = use_state(|| props.query.clone());

    // history replays change the query from outside the input
    {
        let current_input = current_input.clone();
        use_effect_with(props.query.clone(), move |query| {
            current_input.set(query.clone());
            || ()
        });
    }

    let on_input = {
        let current_input = current_input.clone();
        Callback::from(move |e: InputEvent| {
            let input_value = e.target_unchecked_into::<HtmlInputElement>().value();
            current_input.set(input_value);
        })
    };

    let on_submit = {
        let on_search = props.on_search.clone();
        let current_input = current_input.clone();
        Callback::from(move |e: web_sys::SubmitEvent| {
            e.prevent_default(); // Prevent default form submission (page reload)
            on_search.emit((*current_input).clone());
        })
    };

    html! {
        <form onsubmit={on_submit} class="flex mb-4">
            <input
                type="text"
                class="flex-grow p-3 border border-gray-300 rounded-l-lg focus:outline-none focus:ring-2 focus:ring-blue-500"
                placeholder="Enter video keywords..."
                value={(*current_input).clone()}
                oninput={on_input}
                disabled={props.loading}
            />
            <button
                type="submit"
                class="bg-blue-600 text-white p-3 rounded-r-lg hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-blue-500 disabled:opacity-50"
                disabled={props.loading}
            >
                { if props.loading { "Searching..." } else { "Search" } }
            </button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct QuotaChipsProps {
    pub stats: Option<UsageSnapshot>,
}

#[function_component(QuotaChips)]
pub fn quota_chips(props: &QuotaChipsProps) -> Html {
    let Some(stats) = &props.stats else {
        return html! {};
    };

    let usage: f64 = stats
        .quota_info
        .usage_percentage
        .trim_end_matches('%')
        .parse()
        .unwrap_or(0.0);
    let usage_class = if usage > 80.0 {
        "bg-red-100 text-red-800"
    } else if usage > 50.0 {
        "bg-yellow-100 text-yellow-800"
    } else {
        "bg-gray-100 text-gray-800"
    };

    html! {
        <div class="flex flex-wrap justify-center gap-2 mb-4 text-xs">
            <span class="px-2 py-1 rounded-full bg-gray-100 text-gray-800">
                { format!("API calls total: {}", format_number(stats.total_requests)) }
            </span>
            <span class="px-2 py-1 rounded-full bg-gray-100 text-gray-800">
                { format!("Today: {}", format_number(stats.today_requests)) }
            </span>
            <span class={classes!("px-2", "py-1", "rounded-full", usage_class)}>
                { format!("Quota used: {}", stats.quota_info.usage_percentage) }
            </span>
            <span class="px-2 py-1 rounded-full bg-gray-100 text-gray-800">
                { format!("Remaining: {}", format_number(stats.quota_info.remaining_estimate)) }
            </span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoCardProps {
    pub video: VideoResult,
}

#[function_component(VideoCard)]
pub fn video_card(props: &VideoCardProps) -> Html {
    let video = &props.video;
    html! {
        <a href={video.video_url.clone()} target="_blank" rel="noopener noreferrer"
           class="block bg-gray-100 rounded-lg overflow-hidden hover:shadow-lg">
            <img src={video.thumbnail.clone()} alt={video.title.clone()} class="w-full" />
            <div class="p-3">
                <h3 class="text-sm font-semibold text-gray-800 mb-1">{ &video.title }</h3>
                <p class="text-xs text-gray-600">{ format!("📺 {}", video.channel_title) }</p>
                <div class="flex flex-wrap gap-3 text-xs text-gray-700 mt-2">
                    <span class="font-bold text-red-600">{ format!("👁️ {}", format_view_count(video.view_count)) }</span>
                    <span>{ format!("👍 {}", format_view_count(video.like_count)) }</span>
                    <span>{ format!("📅 {}", format_iso8601_date(&video.published_at)) }</span>
                </div>
            </div>
        </a>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultsGridProps {
    pub results: Vec<VideoResult>,
    pub loading: bool,
    pub searched: bool,
    pub error: Option<String>,
}

#[function_component(ResultsGrid)]
pub fn results_grid(props: &ResultsGridProps) -> Html {
    if props.loading {
        return html! {
            <p class="text-center text-gray-500">{"Searching..."}</p>
        };
    }

    if props.results.is_empty() && props.searched && props.error.is_none() {
        return html! {
            <p class="text-center text-gray-500">
                {"No videos above the view threshold. Try other keywords or a lower threshold."}
            </p>
        };
    }

    html! {
        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
            { for props.results.iter().map(|video| html! {
                <VideoCard key={video.id.clone()} video={video.clone()} />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistorySidebarProps {
    pub entries: Vec<HistorySummary>,
    pub on_select: Callback<HistorySummary>,
    pub on_clear: Callback<()>,
}

#[function_component(HistorySidebar)]
pub fn history_sidebar(props: &HistorySidebarProps) -> Html {
    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    html! {
        <aside class="bg-white p-4 rounded-lg shadow-lg w-full md:w-80">
            <div class="flex items-center justify-between mb-3">
                <h2 class="text-lg font-bold text-gray-800">{"Search history"}</h2>
                <div class="flex gap-2 text-sm">
                    <Link<Route> to={Route::Logs} classes="text-blue-600 hover:underline">{"Logs"}</Link<Route>>
                    <Link<Route> to={Route::Statistics} classes="text-blue-600 hover:underline">{"Statistics"}</Link<Route>>
                </div>
            </div>
            {
                if props.entries.is_empty() {
                    html! { <p class="text-center text-gray-500 text-sm">{"No searches yet"}</p> }
                } else {
                    html! {
                        <>
                            <div class="flex items-center justify-between mb-2 text-sm text-gray-600">
                                <span>{ format!("{} entries", props.entries.len()) }</span>
                                <button onclick={on_clear} class="text-red-600 hover:underline">{"Clear all"}</button>
                            </div>
                            <ul class="divide-y divide-gray-200">
                                { for props.entries.iter().map(|entry| {
                                    let on_select = props.on_select.clone();
                                    let selected = entry.clone();
                                    html! {
                                        <li key={entry.id.clone()}
                                            class="py-2 cursor-pointer hover:bg-gray-100"
                                            onclick={move |_| on_select.emit(selected.clone())}>
                                            <p class="font-medium text-gray-800">{ &entry.query }</p>
                                            <p class="text-xs text-gray-500">
                                                { format!("{} • {} videos", format_iso8601_datetime(&entry.timestamp), entry.result_count) }
                                            </p>
                                        </li>
                                    }
                                })}
                            </ul>
                        </>
                    }
                }
            }
        </aside>
    }
}
