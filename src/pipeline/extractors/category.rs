use crate::models::enums::ActivityCategory;
use crate::models::lexicon::CategoryLexicon;

/// Scan the lexicon in priority order; `General` when nothing matches.
pub fn extract_activity_category(text: &str, lexicon: &CategoryLexicon) -> ActivityCategory {
    lexicon.scan(text).unwrap_or(ActivityCategory::General)
}
