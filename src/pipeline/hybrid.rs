use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::engine::IntentEngine;
use super::inference::{ChatCompletionClient, LlmEngine};
use super::rules::RuleEngine;
use crate::clock::Clock;
use crate::config::{EngineConfig, ExtractionSettings};
use crate::models::enums::EngineKind;
use crate::models::request::{
    DatabaseQuery, EngineInfo, ExtractionResult, ProcessedRequest, ValidationReport,
};

/// Routes requests to the remote model or the rule engine.
///
/// The routing flag is fixed at construction. Every remote failure, and any
/// panic inside the remote path, ends in a rule-engine result; `process`
/// never fails.
pub struct HybridEngine {
    use_remote: bool,
    fallback_to_rules: bool,
    remote: Option<LlmEngine>,
    rules: RuleEngine,
}

impl HybridEngine {
    pub fn new(rules: RuleEngine, remote: Option<LlmEngine>, fallback_to_rules: bool) -> Self {
        Self {
            use_remote: remote.is_some(),
            fallback_to_rules,
            remote,
            rules,
        }
    }

    /// Build both engines from the environment configuration.
    ///
    /// An invalid remote configuration, or a client that cannot be built,
    /// leaves the engine in rule mode.
    pub fn from_config(
        config: &EngineConfig,
        settings: Arc<ExtractionSettings>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rules = RuleEngine::new(Arc::clone(&settings), Arc::clone(&clock));
        let remote = if config.use_llm {
            build_remote(config, settings, clock)
        } else {
            None
        };

        tracing::info!(
            use_remote = config.use_llm,
            remote_available = remote.is_some(),
            fallback_to_rules = config.fallback_to_rules,
            "Hybrid engine initialized"
        );

        Self {
            use_remote: config.use_llm,
            fallback_to_rules: config.fallback_to_rules,
            remote,
            rules,
        }
    }

    pub fn process(&self, text: &str) -> ProcessedRequest {
        if let (true, Some(remote)) = (self.use_remote, &self.remote) {
            match catch_unwind(AssertUnwindSafe(|| remote.process(text))) {
                Ok(Ok(request)) => {
                    tracing::info!(request_id = %request.request_id, engine = "LLM", "Request processed");
                    return request;
                }
                Ok(Err(error)) if !self.fallback_to_rules => {
                    tracing::warn!(%error, "Remote inference failed, rule fallback disabled");
                    return remote.empty_result(text);
                }
                Ok(Err(error)) => {
                    tracing::warn!(%error, "Remote inference failed, falling back to rules");
                }
                Err(payload) => {
                    tracing::error!(
                        panic = panic_message(payload.as_ref()),
                        "Remote inference panicked, falling back to rules"
                    );
                }
            }
        }

        let request = self.rules.process(text);
        tracing::info!(request_id = %request.request_id, engine = "rule", "Request processed");
        request
    }

    /// Forwarded to the engine that produced `request`.
    pub fn generate_query(&self, request: &ProcessedRequest) -> DatabaseQuery {
        self.engine_for(request.engine).generate_query(request)
    }

    /// Forwarded to the active engine.
    pub fn validate_input(&self, extraction: &mut ExtractionResult) -> ValidationReport {
        self.engine_for(self.active_engine()).validate_input(extraction)
    }

    pub fn engine_info(&self) -> EngineInfo {
        EngineInfo {
            active_engine: self.active_engine(),
            llm_available: self.remote.is_some(),
            rules_available: true,
        }
    }

    fn active_engine(&self) -> EngineKind {
        if self.use_remote && self.remote.is_some() {
            EngineKind::Llm
        } else {
            EngineKind::Rule
        }
    }

    fn engine_for(&self, kind: EngineKind) -> &dyn IntentEngine {
        match (kind, &self.remote) {
            (EngineKind::Llm, Some(remote)) => remote as &dyn IntentEngine,
            _ => &self.rules as &dyn IntentEngine,
        }
    }
}

fn build_remote(
    config: &EngineConfig,
    settings: Arc<ExtractionSettings>,
    clock: Arc<dyn Clock>,
) -> Option<LlmEngine> {
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::warn!(%error, "Invalid remote inference configuration");
        }
        return None;
    }

    match ChatCompletionClient::from_config(config) {
        Ok(client) => {
            tracing::info!(endpoint = %config.endpoint, model = %config.model, "Remote inference enabled");
            Some(LlmEngine::new(Box::new(client), settings, clock))
        }
        Err(error) => {
            tracing::warn!(%error, "Failed to build inference client");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::enums::ActivityCategory;
    use crate::pipeline::inference::{InferenceError, LlmClient, MockLlmClient};

    const FRIEND_REQUEST: &str =
        "我和我朋友都是16岁，我和他要做一个在4月3号上午的志愿活动，我们想做环保类型的";

    struct PanickingClient;

    impl LlmClient for PanickingClient {
        fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
            panic!("model exploded");
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::on(2026, 10, 19).unwrap())
    }

    fn hybrid(client: Option<Box<dyn LlmClient>>, fallback_to_rules: bool) -> HybridEngine {
        let settings = ExtractionSettings::shared();
        let rules = RuleEngine::new(Arc::clone(&settings), clock());
        let remote = client.map(|c| LlmEngine::new(c, settings, clock()));
        HybridEngine::new(rules, remote, fallback_to_rules)
    }

    #[test]
    fn remote_success_is_tagged_llm() {
        let reply = r#"{"年龄": 16, "人数": 2, "日期": "2027-04-03", "时间": "08:00-12:00", "活动类型": "环保"}"#;
        let engine = hybrid(Some(Box::new(MockLlmClient::new(reply))), true);
        let request = engine.process(FRIEND_REQUEST);
        assert_eq!(request.engine, EngineKind::Llm);
        assert_eq!(request.activity_category, ActivityCategory::Environment);
    }

    #[test]
    fn remote_error_falls_back_to_rules() {
        let client = MockLlmClient::failing(InferenceError::Connection("http://localhost:8000".into()));
        let engine = hybrid(Some(Box::new(client)), true);
        let request = engine.process(FRIEND_REQUEST);
        assert_eq!(request.engine, EngineKind::Rule);
        assert_eq!(request.party_size, 2);
        assert_eq!(request.date.as_deref(), Some("2027-04-03"));
    }

    #[test]
    fn empty_remote_result_falls_back_to_rules() {
        let engine = hybrid(Some(Box::new(MockLlmClient::new("{\"年龄\": null}"))), true);
        assert_eq!(engine.process(FRIEND_REQUEST).engine, EngineKind::Rule);
    }

    #[test]
    fn remote_panic_falls_back_to_rules() {
        let engine = hybrid(Some(Box::new(PanickingClient)), true);
        let request = engine.process(FRIEND_REQUEST);
        assert_eq!(request.engine, EngineKind::Rule);
        assert_eq!(request.time_range.as_deref(), Some("08:00-12:00"));
    }

    #[test]
    fn panic_falls_back_even_with_fallback_disabled() {
        let engine = hybrid(Some(Box::new(PanickingClient)), false);
        assert_eq!(engine.process(FRIEND_REQUEST).engine, EngineKind::Rule);
    }

    #[test]
    fn disabled_fallback_returns_default_llm_result() {
        let engine = hybrid(Some(Box::new(MockLlmClient::failing(InferenceError::Timeout(30)))), false);
        let request = engine.process(FRIEND_REQUEST);
        assert_eq!(request.engine, EngineKind::Llm);
        assert_eq!(request.extraction(), ExtractionResult::default());
        assert!(request.validation.needs_clarification);
    }

    #[test]
    fn rule_mode_without_remote() {
        let engine = hybrid(None, true);
        let request = engine.process(FRIEND_REQUEST);
        assert_eq!(request.engine, EngineKind::Rule);
        assert_eq!(
            engine.engine_info(),
            EngineInfo {
                active_engine: EngineKind::Rule,
                llm_available: false,
                rules_available: true,
            }
        );
    }

    #[test]
    fn engine_info_reports_remote() {
        let engine = hybrid(Some(Box::new(MockLlmClient::new("{}"))), true);
        let info = engine.engine_info();
        assert_eq!(info.active_engine, EngineKind::Llm);
        assert!(info.llm_available);
    }

    #[test]
    fn from_config_rule_mode_by_default() {
        let engine = HybridEngine::from_config(&EngineConfig::default(), ExtractionSettings::shared(), clock());
        assert_eq!(engine.engine_info().active_engine, EngineKind::Rule);
        assert!(!engine.engine_info().llm_available);
    }

    #[test]
    fn from_config_with_invalid_remote_settings_stays_on_rules() {
        let config = EngineConfig {
            use_llm: true,
            endpoint: "not a url".into(),
            ..EngineConfig::default()
        };
        let engine = HybridEngine::from_config(&config, ExtractionSettings::shared(), clock());
        assert_eq!(engine.engine_info().active_engine, EngineKind::Rule);
        assert_eq!(engine.process("明天植树").engine, EngineKind::Rule);
    }

    #[test]
    fn from_config_with_valid_remote_settings_enables_llm() {
        let config = EngineConfig {
            use_llm: true,
            ..EngineConfig::default()
        };
        let engine = HybridEngine::from_config(&config, ExtractionSettings::shared(), clock());
        assert_eq!(engine.engine_info().active_engine, EngineKind::Llm);
    }

    #[test]
    fn query_and_validation_forward_to_engines() {
        let engine = hybrid(None, true);
        let request = engine.process(FRIEND_REQUEST);
        let query = engine.generate_query(&request);
        assert_eq!(query.activity_type, Some(ActivityCategory::Environment));
        assert_eq!(query.age_limit, Some(16));
        assert_eq!(query.participants, 2);

        let mut extraction = request.extraction();
        assert!(!engine.validate_input(&mut extraction).needs_clarification);
    }
}
