use std::sync::LazyLock;

use regex::Regex;

use super::numerals::{numeral_value, NUMERAL_CLASS};

/// Digit patterns, tried in order; the first that matches wins.
static AGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)岁",
        r"(\d+)周岁",
        r"年龄[:：是为]?\s*(\d+)",
        r"(\d+)岁了",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid age regex pattern"))
    .collect()
});

/// A whole run of numeral characters followed by 岁 / 周岁.
static NUMERAL_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({NUMERAL_CLASS}+)周?岁")).expect("Invalid numeral age regex")
});

/// Extract the requester's age. No plausibility bound is applied here.
pub fn extract_age(text: &str) -> Option<u32> {
    for pattern in AGE_PATTERNS.iter() {
        if let Some(age) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return Some(age);
        }
    }

    NUMERAL_AGE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| numeral_value(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_before_sui() {
        assert_eq!(extract_age("我今年16岁"), Some(16));
        assert_eq!(extract_age("我和我朋友都是16岁"), Some(16));
    }

    #[test]
    fn zhousui_and_le_forms() {
        assert_eq!(extract_age("孩子8周岁"), Some(8));
        assert_eq!(extract_age("我18岁了"), Some(18));
    }

    #[test]
    fn age_label_form() {
        assert_eq!(extract_age("年龄35，想参加活动"), Some(35));
        assert_eq!(extract_age("年龄：42"), Some(42));
    }

    #[test]
    fn single_chinese_numeral() {
        assert_eq!(extract_age("弟弟五岁"), Some(5));
        assert_eq!(extract_age("妹妹两周岁"), Some(2));
    }

    #[test]
    fn compound_chinese_numeral_is_not_read() {
        assert_eq!(extract_age("我十八岁"), None);
    }

    #[test]
    fn no_bounds_enforced() {
        assert_eq!(extract_age("我120岁"), Some(120));
        assert_eq!(extract_age("0岁"), Some(0));
    }

    #[test]
    fn nothing_to_extract() {
        assert_eq!(extract_age("明天下午去敬老院"), None);
        assert_eq!(extract_age(""), None);
    }
}
