const HUNDRED_MILLION: u64 = 100_000_000;
const TEN_THOUSAND: u64 = 10_000;

pub fn format_iso8601_date(iso_date: &str) -> String {
    if let Ok(datetime) = iso_date.parse::<chrono::DateTime<chrono::Utc>>() {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        iso_date.to_string()
    }
}

/// `2026-10-19 08:30` in the browser's local time zone.
pub fn format_iso8601_datetime(iso_date: &str) -> String {
    if let Ok(datetime) = iso_date.parse::<chrono::DateTime<chrono::Utc>>() {
        datetime
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    } else {
        iso_date.to_string()
    }
}

// Formats each x1000 step
pub fn format_number(number: u64) -> String {
    let num_str = number.to_string();
    let mut result = String::new();
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Abbreviates in 億 (1e8) and 萬 (1e4) units: 150000000 -> "1.5億", 320000 -> "32.0萬".
pub fn format_view_count(views: u64) -> String {
    if views >= HUNDRED_MILLION {
        format!("{:.1}億", views as f64 / HUNDRED_MILLION as f64)
    } else if views >= TEN_THOUSAND {
        format!("{:.1}萬", views as f64 / TEN_THOUSAND as f64)
    } else {
        format_number(views)
    }
}

/// Whole-unit label for a filter threshold: 100000000 -> "1 億", 10000000 -> "1,000 萬".
pub fn format_view_threshold(views: u64) -> String {
    if views >= HUNDRED_MILLION && views % HUNDRED_MILLION == 0 {
        format!("{} 億", format_number(views / HUNDRED_MILLION))
    } else if views >= TEN_THOUSAND && views % TEN_THOUSAND == 0 {
        format!("{} 萬", format_number(views / TEN_THOUSAND))
    } else {
        format_number(views)
    }
}
