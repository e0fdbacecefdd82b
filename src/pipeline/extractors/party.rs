use std::sync::LazyLock;

use regex::Regex;

use super::numerals::{numeral_value, parse_saturating, NUMERAL_CLASS};

/// `N人`, `N个人`, `N位`, `N名`
static DIGIT_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(?:个人|位|名|人)").expect("Invalid party regex")
});

/// A whole numeral run followed by a person classifier.
static NUMERAL_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({NUMERAL_CLASS}+)(?:个人|位|名|人)")).expect("Invalid numeral party regex")
});

/// Fixed idioms, checked in order after the numeric forms.
const IDIOMS: &[(&str, u32)] = &[
    ("我一个人", 1),
    ("我自己", 1),
    ("独自", 1),
    ("我和他们", 3),
    ("我们三个", 3),
    ("我们俩", 2),
    ("我们两个", 2),
    ("我和朋友", 2),
    ("我和我朋友", 2),
];

/// Loose "me and X" phrase.
const ME_AND: &str = "我和";

/// Extract the party size, clamped to `[1, max_people]`. Defaults to 1.
///
/// Digit and numeral counts take precedence over idiom phrases.
pub fn extract_people_count(text: &str, max_people: u32) -> u32 {
    let count = digit_count(text)
        .or_else(|| numeral_count(text))
        .or_else(|| idiom_count(text))
        .unwrap_or(1);
    count.clamp(1, max_people.max(1))
}

fn digit_count(text: &str) -> Option<u32> {
    DIGIT_COUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_saturating(m.as_str()))
}

fn numeral_count(text: &str) -> Option<u32> {
    NUMERAL_COUNT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| numeral_value(m.as_str()))
}

fn idiom_count(text: &str) -> Option<u32> {
    IDIOMS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, count)| *count)
        .or_else(|| text.contains(ME_AND).then_some(2))
}
