//! Self-healing repairs shared by the rule extractors and the standardizer.
//!
//! Out-of-range values are repaired in place (year roll, period substitution,
//! keyword resolution) rather than rejected.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

use crate::models::enums::ActivityCategory;
use crate::models::lexicon::CategoryLexicon;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Period words and their canonical windows, in lookup order.
pub const PERIOD_RANGES: &[(&str, &str)] = &[
    ("上午", "08:00-12:00"),
    ("下午", "14:00-18:00"),
    ("中午", "11:00-14:00"),
    ("早上", "07:00-10:00"),
    ("晚上", "19:00-22:00"),
    ("傍晚", "17:00-19:00"),
];

static CANONICAL_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-4]):([0-5][0-9])-([01][0-9]|2[0-4]):([0-5][0-9])$")
        .expect("Invalid time range regex")
});

/// Clock-style range with unpadded hours, spaces or a wide separator,
/// e.g. `9:00-12:00`, `14:00 - 18:00`, `14:00～18:00`.
static LOOSE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]{1,2})[:：]([0-9]{2})\s*[-~～至到]\s*([0-9]{1,2})[:：]([0-9]{2})\s*$")
        .expect("Invalid loose time range regex")
});

/// Is `date` inside `[today, today + max_future_days]`?
pub fn date_in_window(date: NaiveDate, today: NaiveDate, max_future_days: i64) -> bool {
    date >= today && date <= today + Duration::days(max_future_days)
}

/// Move a date into the booking window by rolling its year.
///
/// Past dates move to next year; dates beyond the window move back to this
/// year (or next year if that is already past). Returns `None` when no roll
/// lands inside the window, or the month/day does not exist in the target year.
pub fn repair_date(date: NaiveDate, today: NaiveDate, max_future_days: i64) -> Option<NaiveDate> {
    if date_in_window(date, today, max_future_days) {
        return Some(date);
    }

    let rolled = if date < today {
        date.with_year(today.year() + 1)
    } else {
        date.with_year(today.year())
            .and_then(|d| if d < today { d.with_year(today.year() + 1) } else { Some(d) })
    };

    rolled.filter(|d| date_in_window(*d, today, max_future_days))
}

/// Combine a month/day with the current year, then repair into the window.
pub fn date_from_month_day(
    month: u32,
    day: u32,
    today: NaiveDate,
    max_future_days: i64,
) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(today.year(), month, day)
        .or_else(|| NaiveDate::from_ymd_opt(today.year() + 1, month, day))
        .and_then(|d| repair_date(d, today, max_future_days))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Canonical window for a period word, e.g. 上午 → 08:00-12:00.
pub fn period_range(word: &str) -> Option<&'static str> {
    PERIOD_RANGES
        .iter()
        .find(|(period, _)| *period == word.trim())
        .map(|(_, range)| *range)
}

/// First period word contained anywhere in `text`, in lookup order.
pub fn period_range_in(text: &str) -> Option<&'static str> {
    PERIOD_RANGES
        .iter()
        .find(|(period, _)| text.contains(period))
        .map(|(_, range)| *range)
}

/// `HH:MM-HH:MM` with the end after the start.
pub fn is_canonical_time_range(value: &str) -> bool {
    let Some(caps) = CANONICAL_RANGE.captures(value.trim()) else {
        return false;
    };
    let minutes = |h: usize, m: usize| -> u32 {
        let hour: u32 = caps[h].parse().unwrap_or(0);
        let minute: u32 = caps[m].parse().unwrap_or(0);
        hour * 60 + minute
    };
    let (start, end) = (minutes(1, 2), minutes(3, 4));
    end > start && end <= 24 * 60
}

pub fn format_time_range(start: (u32, u32), end: (u32, u32)) -> String {
    format!("{:02}:{:02}-{:02}:{:02}", start.0, start.1, end.0, end.1)
}

/// Rewrite a loosely written clock range into `HH:MM-HH:MM`.
///
/// Returns `None` unless the result is a canonical range with the end after
/// the start.
pub fn canonicalize_time_range(value: &str) -> Option<String> {
    let caps = LOOSE_RANGE.captures(value)?;
    let part = |group: usize| caps[group].parse::<u32>().ok();
    let formatted = format_time_range((part(1)?, part(2)?), (part(3)?, part(4)?));
    is_canonical_time_range(&formatted).then_some(formatted)
}

/// Resolve a free-text category label.
///
/// An exact label (or alias) from the closed set is trusted first; otherwise
/// the lexicon is scanned for keyword hits. Falls back to `General`.
pub fn resolve_category(label: &str, lexicon: &CategoryLexicon) -> ActivityCategory {
    let trimmed = label.trim();
    if let Ok(category) = ActivityCategory::from_str(trimmed) {
        return category;
    }
    lexicon.scan(trimmed).unwrap_or(ActivityCategory::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_inside_window_is_untouched() {
        let today = d(2026, 10, 19);
        assert_eq!(repair_date(d(2026, 12, 1), today, 365), Some(d(2026, 12, 1)));
        assert_eq!(repair_date(today, today, 365), Some(today));
    }

    #[test]
    fn past_date_rolls_to_next_year() {
        let today = d(2026, 10, 19);
        assert_eq!(repair_date(d(2026, 4, 3), today, 365), Some(d(2027, 4, 3)));
        assert_eq!(repair_date(d(2020, 1, 1), today, 365), Some(d(2027, 1, 1)));
    }

    #[test]
    fn far_future_date_rolls_back() {
        let today = d(2026, 10, 19);
        assert_eq!(repair_date(d(2030, 12, 1), today, 365), Some(d(2026, 12, 1)));
        // Back to this year would be past, so it lands next year.
        assert_eq!(repair_date(d(2030, 5, 1), today, 365), Some(d(2027, 5, 1)));
    }

    #[test]
    fn leap_day_without_valid_target_is_dropped() {
        let today = d(2026, 10, 19);
        assert_eq!(repair_date(d(2024, 2, 29), today, 365), None);
    }

    #[test]
    fn month_day_combination() {
        let today = d(2026, 10, 19);
        assert_eq!(date_from_month_day(4, 3, today, 365), Some(d(2027, 4, 3)));
        assert_eq!(date_from_month_day(11, 1, today, 365), Some(d(2026, 11, 1)));
        assert_eq!(date_from_month_day(2, 30, today, 365), None);
        assert_eq!(date_from_month_day(13, 1, today, 365), None);
        assert_eq!(date_from_month_day(0, 1, today, 365), None);
    }

    #[test]
    fn leap_day_uses_next_year_when_current_is_common() {
        let today = d(2027, 10, 19);
        assert_eq!(date_from_month_day(2, 29, today, 365), Some(d(2028, 2, 29)));
    }

    #[test]
    fn period_words_map_to_canonical_ranges() {
        assert_eq!(period_range("上午"), Some("08:00-12:00"));
        assert_eq!(period_range("下午"), Some("14:00-18:00"));
        assert_eq!(period_range("早上"), Some("07:00-10:00"));
        assert_eq!(period_range("中午"), Some("11:00-14:00"));
        assert_eq!(period_range("晚上"), Some("19:00-22:00"));
        assert_eq!(period_range("半夜"), None);
    }

    #[test]
    fn canonical_time_range_check() {
        assert!(is_canonical_time_range("08:00-12:00"));
        assert!(is_canonical_time_range("19:30-24:00"));
        assert!(!is_canonical_time_range("12:00-08:00"));
        assert!(!is_canonical_time_range("8:00-12:00"));
        assert!(!is_canonical_time_range("上午"));
    }

    #[test]
    fn loose_clock_ranges_are_padded() {
        assert_eq!(canonicalize_time_range("9:00-12:00").as_deref(), Some("09:00-12:00"));
        assert_eq!(canonicalize_time_range(" 14:00 - 18:00 ").as_deref(), Some("14:00-18:00"));
        assert_eq!(canonicalize_time_range("14:00～18:00").as_deref(), Some("14:00-18:00"));
        assert_eq!(canonicalize_time_range("8：30至10：00").as_deref(), Some("08:30-10:00"));
    }

    #[test]
    fn loose_clock_ranges_keep_the_window_checks() {
        assert_eq!(canonicalize_time_range("12:00-9:00"), None);
        assert_eq!(canonicalize_time_range("25:00-26:00"), None);
        assert_eq!(canonicalize_time_range("9:75-10:00"), None);
        assert_eq!(canonicalize_time_range("9点-12点"), None);
    }

    #[test]
    fn category_resolution_prefers_exact_labels() {
        let lexicon = CategoryLexicon::remote_inference();
        assert_eq!(resolve_category("动物保护", &lexicon), ActivityCategory::AnimalWelfare);
        assert_eq!(resolve_category(" 医疗 ", &lexicon), ActivityCategory::Medical);
        assert_eq!(resolve_category("垃圾分类宣传", &lexicon), ActivityCategory::Environment);
        assert_eq!(resolve_category("体育", &lexicon), ActivityCategory::General);
    }
}
