use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::repair::{format_time_range, period_range, period_range_in};

/// `H点(M分|半)?到H点(M分|半)?`
static HOUR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[点时](\d{1,2}分?|半)?\s*(?:到|至|-|~)\s*(\d{1,2})[点时](\d{1,2}分?|半)?")
        .expect("Invalid hour range regex")
});

/// `(period)H点`, e.g. 下午3点
static PERIOD_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(上午|下午|早上|中午|晚上|傍晚)(\d{1,2})[点时](\d{1,2}分?|半)?")
        .expect("Invalid period hour regex")
});

/// Words that put a bare hour in the afternoon or evening.
const AFTERNOON_MARKERS: &[&str] = &["下午", "晚上", "傍晚"];

/// Extract the requested time window as `HH:MM-HH:MM`.
///
/// Explicit hour ranges win, then a period word with a start hour, then a
/// bare period word mapped to its canonical window.
pub fn extract_time_range(text: &str) -> Option<String> {
    explicit_range(text)
        .or_else(|| period_with_hour(text))
        .or_else(|| period_range_in(text).map(str::to_string))
}

fn explicit_range(text: &str) -> Option<String> {
    let caps = HOUR_RANGE.captures(text)?;
    let mut start_hour = parse_hour(&caps, 1)?;
    let start_minute = parse_minute(&caps, 2);
    let mut end_hour = parse_hour(&caps, 3)?;
    let end_minute = parse_minute(&caps, 4);

    let afternoon = AFTERNOON_MARKERS.iter().any(|m| text.contains(m));
    if afternoon && start_hour < 12 {
        start_hour += 12;
        if end_hour < 12 {
            end_hour += 12;
        }
    }

    bounded_range((start_hour, start_minute), (end_hour, end_minute))
}

fn period_with_hour(text: &str) -> Option<String> {
    let caps = PERIOD_HOUR.captures(text)?;
    let period = caps.get(1)?.as_str();
    let mut start_hour = parse_hour(&caps, 2)?;
    let start_minute = parse_minute(&caps, 3);

    if AFTERNOON_MARKERS.contains(&period) {
        // 晚上12点 is midnight; 12 has no usable start in these periods.
        if start_hour == 12 {
            return None;
        }
        if start_hour < 12 {
            start_hour += 12;
        }
    }

    let period_end = period_end_hour(period).unwrap_or(start_hour + 1);
    let end_hour = if period_end > start_hour { period_end } else { start_hour + 1 };

    bounded_range((start_hour, start_minute), (end_hour, 0))
}

fn period_end_hour(period: &str) -> Option<u32> {
    period_range(period)?.split('-').nth(1)?.split(':').next()?.parse().ok()
}

fn parse_hour(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn parse_minute(caps: &Captures<'_>, group: usize) -> u32 {
    match caps.get(group).map(|m| m.as_str()) {
        Some("半") => 30,
        Some(raw) => raw.trim_end_matches('分').parse().unwrap_or(0),
        None => 0,
    }
}

/// Format the range if it is a real same-day window with the end after the start.
fn bounded_range(start: (u32, u32), end: (u32, u32)) -> Option<String> {
    let start_total = start.0 * 60 + start.1;
    let end_total = end.0 * 60 + end.1;
    let valid = start.0 < 24
        && start.1 < 60
        && end.1 < 60
        && end_total <= 24 * 60
        && end_total > start_total;
    valid.then(|| format_time_range(start, end))
}
