use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

use super::extractors::{extract_date, extract_time_range};
use super::repair::{
    canonicalize_time_range, format_date, is_canonical_time_range, parse_date, period_range,
    repair_date, resolve_category,
};
use crate::config::ExtractionSettings;
use crate::models::enums::ActivityCategory;
use crate::models::request::ExtractionResult;

const AGE_KEYS: &[&str] = &["年龄", "age"];
const PARTY_KEYS: &[&str] = &["人数", "party_size"];
const DATE_KEYS: &[&str] = &["日期", "date"];
const TIME_KEYS: &[&str] = &["时间", "time_range"];
const CATEGORY_KEYS: &[&str] = &["活动类型", "activity_category"];

const MIN_AGE: i64 = 1;
const MAX_AGE: i64 = 100;

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+)").expect("Invalid leading integer regex"));

/// Coerce a loosely typed model reply into the canonical schema.
///
/// Keys may be the Chinese field names used in the prompt or the canonical
/// English names. A field that cannot be coerced takes its default
/// (`None`, 1, `None`, `None`, `General`). Running the result back through
/// this function yields the same result.
pub fn standardize(
    raw: &Map<String, Value>,
    today: NaiveDate,
    settings: &ExtractionSettings,
) -> ExtractionResult {
    let result = ExtractionResult {
        age: field(raw, AGE_KEYS).and_then(coerce_age),
        party_size: field(raw, PARTY_KEYS)
            .and_then(coerce_count)
            .map_or(1, |count| clamp_count(count, settings.max_people)),
        date: field(raw, DATE_KEYS)
            .and_then(Value::as_str)
            .and_then(|date| coerce_date(date, today, settings.max_future_days)),
        time_range: field(raw, TIME_KEYS)
            .and_then(Value::as_str)
            .and_then(coerce_time_range),
        activity_category: field(raw, CATEGORY_KEYS)
            .and_then(Value::as_str)
            .map_or(ActivityCategory::General, |label| {
                resolve_category(label, &settings.inference_lexicon)
            }),
    };

    tracing::debug!(
        has_age = result.age.is_some(),
        party_size = result.party_size,
        has_date = result.date.is_some(),
        has_time = result.time_range.is_some(),
        category = %result.activity_category,
        "Standardized model output"
    );

    result
}

/// First non-null value among `keys`.
fn field<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| raw.get(*key)).find(|v| !v.is_null())
}

fn coerce_age(value: &Value) -> Option<u32> {
    let age = coerce_count(value)?;
    (MIN_AGE..=MAX_AGE).contains(&age).then_some(age as u32)
}

/// Whole number from a JSON number or the leading digits of a string.
fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => LEADING_INTEGER
            .captures(s)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().parse::<i64>().unwrap_or(i64::MAX)),
        _ => None,
    }
}

fn clamp_count(count: i64, max_people: u32) -> u32 {
    count.clamp(1, i64::from(max_people.max(1))) as u32
}

fn coerce_date(value: &str, today: NaiveDate, max_future_days: i64) -> Option<String> {
    match parse_date(value) {
        Some(date) => repair_date(date, today, max_future_days).map(format_date),
        None => extract_date(value, today, max_future_days),
    }
}

fn coerce_time_range(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if is_canonical_time_range(trimmed) {
        return Some(trimmed.to_string());
    }
    canonicalize_time_range(trimmed)
        .or_else(|| period_range(trimmed).map(str::to_string))
        .or_else(|| extract_time_range(trimmed))
}
