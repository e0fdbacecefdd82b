//! Independent field extractors.
//!
//! Each extractor is a pure function over the normalized request text. A
//! missing match is reported as `None` (or the field default), never as an
//! error, and no extractor depends on another's output.

pub mod numerals;
pub mod age;
pub mod party;
pub mod date;
pub mod time_range;
pub mod category;

pub use age::extract_age;
pub use party::extract_people_count;
pub use date::{extract_date, relative_day_offset};
pub use time_range::extract_time_range;
pub use category::extract_activity_category;
