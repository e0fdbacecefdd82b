use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::models::lexicon::CategoryLexicon;

/// Application-level constants
pub const APP_NAME: &str = "volunteer-intent";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on the party size; larger counts are truncated, never rejected.
pub const MAX_PEOPLE: u32 = 50;

/// How far ahead (in days) a requested date may lie.
pub const MAX_FUTURE_DAYS: i64 = 365;

/// Window used when the request names no time at all.
pub const DEFAULT_TIME_RANGE: &str = "09:00-17:00";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen-6b-chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,volunteer_intent=debug"
    } else {
        "warn,volunteer_intent=info"
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LLM_MODEL_ENDPOINT must be a valid http(s) URL, got '{0}'")]
    InvalidEndpoint(String),

    #[error("LLM_TIMEOUT must be between 1 and 300 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{name} must be a whole number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("LLM_MODEL_TYPE must not be empty")]
    EmptyModel,
}

/// Environment-sourced runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub use_llm: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub fallback_to_rules: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_llm: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fallback_to_rules: true,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    ///
    /// Values that cannot be read at all (a flag that is neither true nor
    /// false, a non-numeric timeout) are reported as errors and replaced by
    /// their defaults so the caller still gets a usable configuration.
    pub fn from_env() -> (Self, Vec<ConfigError>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut errors = Vec::new();

        let use_llm = read_flag(&lookup, "USE_LLM", defaults.use_llm, &mut errors);
        let fallback_to_rules = read_flag(
            &lookup,
            "FALLBACK_TO_RULES",
            defaults.fallback_to_rules,
            &mut errors,
        );

        let endpoint = lookup("LLM_MODEL_ENDPOINT")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.endpoint);
        let model = lookup("LLM_MODEL_TYPE")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.model);

        let timeout_secs = match lookup("LLM_TIMEOUT") {
            None => defaults.timeout_secs,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => secs,
                Err(_) => {
                    errors.push(ConfigError::InvalidNumber {
                        name: "LLM_TIMEOUT",
                        value: raw,
                    });
                    defaults.timeout_secs
                }
            },
        };

        let config = Self {
            use_llm,
            endpoint,
            model,
            timeout_secs,
            fallback_to_rules,
        };
        (config, errors)
    }

    /// Check every constraint on the remote-inference settings.
    ///
    /// Only meaningful when `use_llm` is set; a rule-only configuration is
    /// always valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.use_llm {
            return errors;
        }

        let endpoint_ok = Url::parse(&self.endpoint)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !endpoint_ok {
            errors.push(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            errors.push(ConfigError::TimeoutOutOfRange(self.timeout_secs));
        }

        if self.model.is_empty() {
            errors.push(ConfigError::EmptyModel);
        }

        errors
    }

    /// One-line rendering of the active configuration for the startup log.
    pub fn summary(&self) -> String {
        format!(
            "USE_LLM={} LLM_MODEL_ENDPOINT={} LLM_MODEL_TYPE={} FALLBACK_TO_RULES={} LLM_TIMEOUT={}s",
            self.use_llm, self.endpoint, self.model, self.fallback_to_rules, self.timeout_secs
        )
    }
}

fn read_flag<F>(lookup: &F, name: &'static str, default: bool, errors: &mut Vec<ConfigError>) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => default,
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                errors.push(ConfigError::InvalidFlag { name, value: raw });
                default
            }
        },
    }
}

/// Immutable settings shared by every engine instance.
///
/// Built once and handed to engines at construction, so engines with
/// different vocabularies can coexist in one process.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub max_people: u32,
    pub max_future_days: i64,
    /// Ages outside `[min_plausible_age, max_plausible_age]` produce a warning.
    pub min_plausible_age: u32,
    pub max_plausible_age: u32,
    pub default_time_range: String,
    /// Keyword table scanned by the rule engine.
    pub rule_lexicon: CategoryLexicon,
    /// Keyword table used to resolve free-text categories from the remote model.
    pub inference_lexicon: CategoryLexicon,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_people: MAX_PEOPLE,
            max_future_days: MAX_FUTURE_DAYS,
            min_plausible_age: 5,
            max_plausible_age: 80,
            default_time_range: DEFAULT_TIME_RANGE.to_string(),
            rule_lexicon: CategoryLexicon::rule_based(),
            inference_lexicon: CategoryLexicon::remote_inference(),
        }
    }
}

impl ExtractionSettings {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let (config, errors) = EngineConfig::from_lookup(|_| None);
        assert!(errors.is_empty());
        assert_eq!(config, EngineConfig::default());
        assert!(!config.use_llm);
        assert!(config.fallback_to_rules);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn reads_all_variables() {
        let (config, errors) = EngineConfig::from_lookup(lookup_from(&[
            ("USE_LLM", "TRUE"),
            ("LLM_MODEL_ENDPOINT", "https://llm.internal/v1/chat/completions"),
            ("LLM_MODEL_TYPE", "qwen-7b"),
            ("LLM_TIMEOUT", "12"),
            ("FALLBACK_TO_RULES", "false"),
        ]));
        assert!(errors.is_empty());
        assert!(config.use_llm);
        assert_eq!(config.endpoint, "https://llm.internal/v1/chat/completions");
        assert_eq!(config.model, "qwen-7b");
        assert_eq!(config.timeout_secs, 12);
        assert!(!config.fallback_to_rules);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn unreadable_values_fall_back_to_defaults_with_errors() {
        let (config, errors) = EngineConfig::from_lookup(lookup_from(&[
            ("USE_LLM", "yes"),
            ("LLM_TIMEOUT", "soon"),
        ]));
        assert!(!config.use_llm);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ConfigError::InvalidFlag { name: "USE_LLM", .. }));
        assert!(matches!(errors[1], ConfigError::InvalidNumber { name: "LLM_TIMEOUT", .. }));
    }

    #[test]
    fn validate_rejects_non_http_endpoint_and_timeout_bounds() {
        let config = EngineConfig {
            use_llm: true,
            endpoint: "ftp://example.com/model".into(),
            timeout_secs: 301,
            ..EngineConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ConfigError::InvalidEndpoint(_)));
        assert_eq!(errors[1], ConfigError::TimeoutOutOfRange(301));
    }

    #[test]
    fn validate_rejects_zero_timeout_and_garbage_url() {
        let config = EngineConfig {
            use_llm: true,
            endpoint: "localhost:8000".into(),
            timeout_secs: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn rule_only_configuration_is_always_valid() {
        let config = EngineConfig {
            use_llm: false,
            endpoint: "not a url".into(),
            timeout_secs: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn summary_lists_every_setting() {
        let summary = EngineConfig::default().summary();
        assert!(summary.contains("USE_LLM=false"));
        assert!(summary.contains(DEFAULT_ENDPOINT));
        assert!(summary.contains("LLM_TIMEOUT=30s"));
    }

    #[test]
    fn default_settings_use_documented_limits() {
        let settings = ExtractionSettings::default();
        assert_eq!(settings.max_people, 50);
        assert_eq!(settings.max_future_days, 365);
        assert_eq!(settings.default_time_range, "09:00-17:00");
    }

    #[test]
    fn app_name_is_stable() {
        assert_eq!(APP_NAME, "volunteer-intent");
    }
}
