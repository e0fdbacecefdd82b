/// Small Chinese numerals understood by the age and party extractors.
const NUMERALS: &[(&str, u32)] = &[
    ("一", 1),
    ("二", 2),
    ("三", 3),
    ("四", 4),
    ("五", 5),
    ("六", 6),
    ("七", 7),
    ("八", 8),
    ("九", 9),
    ("十", 10),
    ("两", 2),
    ("俩", 2),
];

/// Character class matching one numeral from the table, for use in regexes.
pub const NUMERAL_CLASS: &str = "[一二三四五六七八九十两俩]";

/// Value of a whole numeral run. Compound numerals such as 十八 are not in the
/// table and yield `None`.
pub fn numeral_value(run: &str) -> Option<u32> {
    NUMERALS
        .iter()
        .find(|(numeral, _)| *numeral == run)
        .map(|(_, value)| *value)
}

/// Parse a run of ASCII digits, saturating instead of overflowing.
pub fn parse_saturating(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}
