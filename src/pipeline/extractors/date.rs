use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::pipeline::repair::{date_from_month_day, date_in_window, format_date};

/// Explicit month/day forms, tried in order.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)月(\d+)日",
        r"(\d+)月(\d+)号",
        r"(\d+)/(\d+)",
        r"(\d+)\.(\d+)",
        r"(\d+)月(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid date regex pattern"))
    .collect()
});

/// Relative-day keywords. Longer keywords come first because 后天 is a
/// substring of 大后天.
const RELATIVE_DAYS: &[(&str, i64)] = &[("大后天", 3), ("后天", 2), ("明天", 1)];

/// Extract the requested date as `YYYY-MM-DD`.
///
/// Explicit month/day forms win over relative keywords. The first
/// syntactically valid month/day (1–12 / 1–31) is combined with the current
/// year and rolled into `[today, today + max_future_days]`.
pub fn extract_date(text: &str, today: NaiveDate, max_future_days: i64) -> Option<String> {
    if let Some((month, day)) = explicit_month_day(text) {
        return date_from_month_day(month, day, today, max_future_days).map(format_date);
    }

    relative_day_offset(text)
        .map(|offset| today + Duration::days(offset))
        .filter(|date| date_in_window(*date, today, max_future_days))
        .map(format_date)
}

fn explicit_month_day(text: &str) -> Option<(u32, u32)> {
    DATE_PATTERNS.iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|caps| {
            let month: u32 = caps.get(1)?.as_str().parse().ok()?;
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some((month, day))
        })
    })
}

/// Days from today named by a relative keyword (明天, 后天, 大后天).
pub fn relative_day_offset(text: &str) -> Option<i64> {
    RELATIVE_DAYS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, offset)| *offset)
}
