use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::enums::{ActivityCategory, EngineKind};

/// Label used for the "no age restriction" sentinel.
pub const UNRESTRICTED_AGE_LABEL: &str = "不限";

/// The canonical five-field extraction schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub age: Option<u32>,
    pub party_size: u32,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM-HH:MM`
    pub time_range: Option<String>,
    pub activity_category: ActivityCategory,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            age: None,
            party_size: 1,
            date: None,
            time_range: None,
            activity_category: ActivityCategory::General,
        }
    }
}

/// Outcome of validating an [`ExtractionResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub needs_clarification: bool,
    pub questions: Vec<String>,
    pub warnings: Vec<String>,
}

/// Age after default-fill: either a concrete age or the unrestricted sentinel.
///
/// Serialized as a bare number or as the "不限" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRequirement {
    Years(u32),
    Unrestricted,
}

impl AgeRequirement {
    pub fn years(&self) -> Option<u32> {
        match self {
            Self::Years(age) => Some(*age),
            Self::Unrestricted => None,
        }
    }
}

impl From<Option<u32>> for AgeRequirement {
    fn from(age: Option<u32>) -> Self {
        age.map_or(Self::Unrestricted, Self::Years)
    }
}

impl Serialize for AgeRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Years(age) => serializer.serialize_u32(*age),
            Self::Unrestricted => serializer.serialize_str(UNRESTRICTED_AGE_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for AgeRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Years(u32),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Years(age) => Ok(Self::Years(age)),
            Raw::Label(label)
                if label == UNRESTRICTED_AGE_LABEL || label.eq_ignore_ascii_case("unrestricted") =>
            {
                Ok(Self::Unrestricted)
            }
            Raw::Label(label) => Err(D::Error::custom(format!("unexpected age label '{label}'"))),
        }
    }
}

/// A fully processed request as returned by an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRequest {
    pub request_id: Uuid,
    pub raw_input: String,
    pub age: AgeRequirement,
    pub party_size: u32,
    pub date: Option<String>,
    pub time_range: Option<String>,
    pub activity_category: ActivityCategory,
    pub validation: ValidationReport,
    pub engine: EngineKind,
    /// `%Y-%m-%d %H:%M:%S`
    pub processed_at: String,
}

impl ProcessedRequest {
    /// The five canonical fields, with the age sentinel mapped back to `None`.
    pub fn extraction(&self) -> ExtractionResult {
        ExtractionResult {
            age: self.age.years(),
            party_size: self.party_size,
            date: self.date.clone(),
            time_range: self.time_range.clone(),
            activity_category: self.activity_category,
        }
    }
}

/// Filter handed to the activity catalog. Absent keys mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    pub participants: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_limit: Option<u32>,
}

impl DatabaseQuery {
    /// Project a processed request onto catalog filter keys, omitting the
    /// unrestricted age and the general category.
    pub fn from_request(request: &ProcessedRequest) -> Self {
        Self {
            activity_type: Some(request.activity_category).filter(|c| !c.is_general()),
            date: request.date.clone(),
            time_range: request.time_range.clone(),
            participants: request.party_size,
            age_limit: request.age.years(),
        }
    }
}

/// Which engines a dispatcher has available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub active_engine: EngineKind,
    pub llm_available: bool,
    pub rules_available: bool,
}
