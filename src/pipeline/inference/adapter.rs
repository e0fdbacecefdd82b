use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::client::LlmClient;
use super::parser::parse_inference_response;
use super::prompt::build_extraction_prompt;
use super::InferenceError;
use crate::clock::Clock;
use crate::config::ExtractionSettings;
use crate::models::enums::EngineKind;
use crate::models::request::{ExtractionResult, ProcessedRequest, ValidationReport};
use crate::pipeline::engine::{assemble_request, IntentEngine};
use crate::pipeline::lexical::normalize_text;
use crate::pipeline::standardize::standardize;
use crate::pipeline::validation::validate_extraction;

/// Prompt → remote call → JSON object. One attempt, no retries.
pub struct InferenceAdapter {
    client: Box<dyn LlmClient>,
    clock: Arc<dyn Clock>,
}

impl InferenceAdapter {
    pub fn new(client: Box<dyn LlmClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Ask the model for the five fields of `text`.
    ///
    /// Fails on any transport or parse problem, and when the reply carries
    /// no usable field at all.
    pub fn infer(&self, text: &str) -> Result<Map<String, Value>, InferenceError> {
        let prompt = build_extraction_prompt(text, self.clock.today());
        let reply = self.client.complete(&prompt)?;
        tracing::debug!(reply_chars = reply.chars().count(), "Received inference reply");
        parse_inference_response(&reply)
    }
}

/// Engine backed by the remote model: adapter → standardizer → validator.
///
/// Unlike the rule engine, missing fields are left empty after validation.
pub struct LlmEngine {
    adapter: InferenceAdapter,
    settings: Arc<ExtractionSettings>,
    clock: Arc<dyn Clock>,
}

impl LlmEngine {
    pub fn new(
        client: Box<dyn LlmClient>,
        settings: Arc<ExtractionSettings>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            adapter: InferenceAdapter::new(client, Arc::clone(&clock)),
            settings,
            clock,
        }
    }

    /// The standardized default result, validated and tagged as LLM output.
    ///
    /// Returned instead of a rule-engine run when rule fallback is disabled.
    pub fn empty_result(&self, text: &str) -> ProcessedRequest {
        self.finish(Uuid::new_v4(), text, ExtractionResult::default())
    }

    fn finish(
        &self,
        request_id: Uuid,
        text: &str,
        mut extraction: ExtractionResult,
    ) -> ProcessedRequest {
        let validation = validate_extraction(&mut extraction, self.clock.today(), &self.settings);
        assemble_request(
            request_id,
            text,
            extraction,
            validation,
            EngineKind::Llm,
            self.clock.as_ref(),
        )
    }
}

impl IntentEngine for LlmEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Llm
    }

    fn process(&self, text: &str) -> Result<ProcessedRequest, InferenceError> {
        let request_id = Uuid::new_v4();
        let _span =
            tracing::info_span!("process_request", request_id = %request_id, engine = "LLM").entered();

        let normalized = normalize_text(text);
        let raw = self.adapter.infer(&normalized)?;
        let extraction = standardize(&raw, self.clock.today(), &self.settings);
        Ok(self.finish(request_id, text, extraction))
    }

    fn validate_input(&self, extraction: &mut ExtractionResult) -> ValidationReport {
        validate_extraction(extraction, self.clock.today(), &self.settings)
    }
}
