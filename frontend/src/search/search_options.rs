use crate::utils::format_view_threshold;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::Event;
use yew::{function_component, html, Callback, Html, Properties};

pub const MAX_RESULTS_CHOICES: [u32; 4] = [50, 100, 150, 200];
// 100 so the default search exercises pagination
pub const DEFAULT_MAX_RESULTS: u32 = 100;

pub const MIN_VIEW_CHOICES: [u64; 6] = [
    10_000_000,
    50_000_000,
    100_000_000,
    200_000_000,
    500_000_000,
    1_000_000_000,
];
pub const DEFAULT_MIN_VIEW_COUNT: u64 = 100_000_000;

/// More than one search page is needed above 50 results.
pub fn max_results_label(max_results: u32) -> String {
    if max_results > 50 {
        format!("{max_results} (paged)")
    } else {
        max_results.to_string()
    }
}

// Helper to read "value" from any event target without HtmlSelectElement.
fn event_value(e: &Event) -> Option<String> {
    let target = e.target()?;
    let js_value = Reflect::get(target.as_ref(), &JsValue::from_str("value")).ok()?;
    js_value.as_string()
}

#[derive(Properties, PartialEq)]
pub struct SearchOptionsProps {
    pub max_results: u32,
    pub min_view_count: u64,
    pub on_max_results_change: Callback<u32>,
    pub on_min_view_count_change: Callback<u64>,
}

#[function_component(SearchOptionsDropdowns)]
pub fn search_options(props: &SearchOptionsProps) -> Html {
    let on_max_results_change_cb = props.on_max_results_change.clone();
    let on_max_results_change = Callback::from(move |e: Event| {
        if let Some(value) = event_value(&e).and_then(|v| v.parse::<u32>().ok()) {
            on_max_results_change_cb.emit(value);
        }
    });

    let on_min_view_count_change_cb = props.on_min_view_count_change.clone();
    let on_min_view_count_change = Callback::from(move |e: Event| {
        if let Some(value) = event_value(&e).and_then(|v| v.parse::<u64>().ok()) {
            on_min_view_count_change_cb.emit(value);
        }
    });

    html! {
        <div class="search-options flex gap-4 mb-4 text-sm text-gray-700">
            <label class="search-option">
                { "Results to scan " }
                <select value={props.max_results.to_string()} onchange={on_max_results_change}>
                    {
                        for MAX_RESULTS_CHOICES.iter().map(|&choice| html! {
                            <option value={choice.to_string()} selected={choice == props.max_results}>
                                { max_results_label(choice) }
                            </option>
                        })
                    }
                </select>
            </label>

            <label class="search-option">
                { "Minimum views " }
                <select value={props.min_view_count.to_string()} onchange={on_min_view_count_change}>
                    {
                        for MIN_VIEW_CHOICES.iter().map(|&choice| html! {
                            <option value={choice.to_string()} selected={choice == props.min_view_count}>
                                { format!("≥ {}", format_view_threshold(choice)) }
                            </option>
                        })
                    }
                </select>
            </label>
        </div>
    }
}
