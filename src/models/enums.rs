use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {field} value: '{value}'")]
pub struct UnknownVariant {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The label is also the serialized form; extra aliases are accepted on parse.
macro_rules! label_enum {
    ($name:ident { $($variant:ident => $s:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s $(, alias = $alias)*)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s $(| $alias)* => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum!(ActivityCategory {
    Environment => "环保" | "environment",
    Education => "教育" | "education",
    CommunityService => "社区服务" | "community_service",
    Medical => "医疗" | "medical",
    AnimalWelfare => "动物保护" | "animal_welfare",
    General => "综合" | "general",
});

impl ActivityCategory {
    /// The closed set of concrete categories (everything except `General`).
    pub const CONCRETE: [ActivityCategory; 5] = [
        Self::Environment,
        Self::Education,
        Self::CommunityService,
        Self::Medical,
        Self::AnimalWelfare,
    ];

    pub fn is_general(&self) -> bool {
        matches!(self, Self::General)
    }
}

impl Default for ActivityCategory {
    fn default() -> Self {
        Self::General
    }
}

label_enum!(EngineKind {
    Llm => "LLM" | "llm",
    Rule => "rule" | "规则",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_labels_round_trip_through_from_str() {
        for category in ActivityCategory::CONCRETE {
            assert_eq!(ActivityCategory::from_str(category.as_str()), Ok(category));
        }
        assert_eq!(ActivityCategory::from_str("综合"), Ok(ActivityCategory::General));
    }

    #[test]
    fn category_accepts_english_aliases() {
        assert_eq!(
            ActivityCategory::from_str("community_service"),
            Ok(ActivityCategory::CommunityService)
        );
        assert_eq!(
            ActivityCategory::from_str("animal_welfare"),
            Ok(ActivityCategory::AnimalWelfare)
        );
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = ActivityCategory::from_str("sports").unwrap_err();
        assert_eq!(err.field, "ActivityCategory");
        assert_eq!(err.value, "sports");
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&ActivityCategory::Environment).unwrap();
        assert_eq!(json, "\"环保\"");
        let parsed: ActivityCategory = serde_json::from_str("\"education\"").unwrap();
        assert_eq!(parsed, ActivityCategory::Education);
    }

    #[test]
    fn engine_kind_labels() {
        assert_eq!(EngineKind::Llm.as_str(), "LLM");
        assert_eq!(EngineKind::Rule.to_string(), "rule");
        assert_eq!(EngineKind::from_str("规则"), Ok(EngineKind::Rule));
    }

    #[test]
    fn general_is_default_and_not_concrete() {
        assert_eq!(ActivityCategory::default(), ActivityCategory::General);
        assert!(ActivityCategory::General.is_general());
        assert!(!ActivityCategory::CONCRETE.contains(&ActivityCategory::General));
    }
}
