// Clarification and plausibility checks on a standardized extraction.
// Invalid dates are nulled and oversized parties clamped in place; every rule
// runs regardless of the others.

use chrono::{Duration, NaiveDate};

use super::repair::parse_date;
use crate::config::ExtractionSettings;
use crate::models::request::{ExtractionResult, ValidationReport};

/// Parties larger than this are asked to confirm their count.
const CONFIRM_PARTY_ABOVE: u32 = 20;

/// Time values that mean "no specific window was given".
const PLACEHOLDER_TIMES: &[&str] = &["不限", "未指定", "unspecified"];

pub const ASK_DATE: &str = "请问您希望参加活动的具体日期是？";
pub const ASK_FUTURE_DATE: &str = "请重新选择未来的活动日期";
pub const ASK_DATE_WITHIN_YEAR: &str = "请选择一年内的活动日期";
pub const ASK_DATE_FORMAT: &str = "请提供正确的日期格式，如：4月3日";
pub const ASK_TIME: &str = "请问您希望活动的具体时间段是？";
pub const ASK_CATEGORY: &str = "请问您希望参加什么类型的志愿活动？";

pub const WARN_PAST_DATE: &str = "您选择的日期已经过去，请选择未来的日期";
pub const WARN_FAR_DATE: &str = "您选择的日期太远了，建议选择一年内的日期";
pub const WARN_DATE_FORMAT: &str = "日期格式不正确";
pub const WARN_AGE: &str = "年龄范围异常，请确认年龄信息";

/// Validate `result`, nulling invalid fields in place.
///
/// `needs_clarification` is set whenever at least one question was raised.
pub fn validate_extraction(
    result: &mut ExtractionResult,
    today: NaiveDate,
    settings: &ExtractionSettings,
) -> ValidationReport {
    let mut questions = Vec::new();
    let mut warnings = Vec::new();

    check_date(result, today, settings.max_future_days, &mut questions, &mut warnings);
    check_time(result, &settings.default_time_range, &mut questions);
    check_party_size(result, settings.max_people, &mut questions, &mut warnings);
    check_category(result, &mut questions);
    check_age(result, settings, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            warning_count = warnings.len(),
            question_count = questions.len(),
            "Extraction validation warnings"
        );
    }

    ValidationReport {
        needs_clarification: !questions.is_empty(),
        questions,
        warnings,
    }
}

fn check_date(
    result: &mut ExtractionResult,
    today: NaiveDate,
    max_future_days: i64,
    questions: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let Some(raw) = result.date.as_deref() else {
        questions.push(ASK_DATE.to_string());
        return;
    };

    match parse_date(raw) {
        None => {
            warnings.push(WARN_DATE_FORMAT.to_string());
            result.date = None;
            questions.push(ASK_DATE_FORMAT.to_string());
        }
        Some(date) if date < today => {
            warnings.push(WARN_PAST_DATE.to_string());
            result.date = None;
            questions.push(ASK_FUTURE_DATE.to_string());
        }
        Some(date) if date > today + Duration::days(max_future_days) => {
            warnings.push(WARN_FAR_DATE.to_string());
            result.date = None;
            questions.push(ASK_DATE_WITHIN_YEAR.to_string());
        }
        Some(_) => {}
    }
}

fn check_time(result: &ExtractionResult, default_window: &str, questions: &mut Vec<String>) {
    let unspecified = match result.time_range.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(time) => time == default_window || PLACEHOLDER_TIMES.contains(&time),
    };
    if unspecified {
        questions.push(ASK_TIME.to_string());
    }
}

fn check_party_size(
    result: &mut ExtractionResult,
    max_people: u32,
    questions: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if result.party_size > max_people {
        warnings.push(format!("人数过多，已限制为{max_people}人"));
        result.party_size = max_people;
    } else if result.party_size > CONFIRM_PARTY_ABOVE {
        questions.push(format!("您计划{}人参加，请确认具体人数", result.party_size));
    }
}

fn check_category(result: &ExtractionResult, questions: &mut Vec<String>) {
    if result.activity_category.is_general() {
        questions.push(ASK_CATEGORY.to_string());
    }
}

/// Softer than the other checks: warn only, keep the value.
fn check_age(result: &ExtractionResult, settings: &ExtractionSettings, warnings: &mut Vec<String>) {
    if let Some(age) = result.age {
        if age < settings.min_plausible_age || age > settings.max_plausible_age {
            warnings.push(WARN_AGE.to_string());
        }
    }
}
