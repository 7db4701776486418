const HUNDRED_MILLION: u64 = 100_000_000;
const TEN_THOUSAND: u64 = 10_000;

/// Formats each x1000 step: 1234567 -> "1,234,567"
pub fn format_with_separators(number: u64) -> String {
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

/// Human readable filter threshold, counted in 億 (1e8) and 萬 (1e4) units.
pub fn describe_view_threshold(min_view_count: u64) -> String {
    if min_view_count >= HUNDRED_MILLION {
        format!("views ≥ {} 億", round_half_up(min_view_count, HUNDRED_MILLION))
    } else if min_view_count >= TEN_THOUSAND {
        format!("views ≥ {} 萬", round_half_up(min_view_count, TEN_THOUSAND))
    } else {
        format!("views ≥ {}", format_with_separators(min_view_count))
    }
}

fn round_half_up(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

/// "12.34%" with two decimals, or "0%" when there is nothing to divide by.
pub fn format_percentage(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", part as f64 / whole as f64 * 100.0)
}
