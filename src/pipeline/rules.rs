use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::engine::{assemble_request, IntentEngine};
use super::extractors::{
    extract_activity_category, extract_age, extract_date, extract_people_count, extract_time_range,
};
use super::inference::InferenceError;
use super::lexical::{normalize_text, Segmenter};
use super::repair::format_date;
use super::validation::validate_extraction;
use crate::clock::Clock;
use crate::config::ExtractionSettings;
use crate::models::enums::EngineKind;
use crate::models::request::{DatabaseQuery, ExtractionResult, ProcessedRequest, ValidationReport};

/// Local pattern-based engine: extract → validate → default-fill.
///
/// Infallible for any string input.
pub struct RuleEngine {
    settings: Arc<ExtractionSettings>,
    clock: Arc<dyn Clock>,
    segmenter: Segmenter,
}

impl RuleEngine {
    pub fn new(settings: Arc<ExtractionSettings>, clock: Arc<dyn Clock>) -> Self {
        let segmenter = Segmenter::with_lexicon(&settings.rule_lexicon);
        Self {
            settings,
            clock,
            segmenter,
        }
    }

    pub fn process(&self, text: &str) -> ProcessedRequest {
        let request_id = Uuid::new_v4();
        let _span =
            tracing::info_span!("process_request", request_id = %request_id, engine = "rule").entered();

        let normalized = normalize_text(text);
        tracing::debug!(
            input_chars = normalized.chars().count(),
            tokens = ?self.segmenter.segment(&normalized),
            "Segmented request"
        );

        let today = self.clock.today();
        let mut extraction = self.extract(&normalized, today);

        // Validate the raw extraction, then default-fill.
        let validation = validate_extraction(&mut extraction, today, &self.settings);
        self.fill_defaults(&mut extraction, today);

        assemble_request(
            request_id,
            text,
            extraction,
            validation,
            EngineKind::Rule,
            self.clock.as_ref(),
        )
    }

    /// Run the five extractors over already-normalized text.
    pub fn extract(&self, text: &str, today: NaiveDate) -> ExtractionResult {
        ExtractionResult {
            age: extract_age(text),
            party_size: extract_people_count(text, self.settings.max_people),
            date: extract_date(text, today, self.settings.max_future_days),
            time_range: extract_time_range(text),
            activity_category: extract_activity_category(text, &self.settings.rule_lexicon),
        }
    }

    /// Date falls back to today, time to the default window. A missing age
    /// stays `None` and becomes the unrestricted sentinel.
    fn fill_defaults(&self, extraction: &mut ExtractionResult, today: NaiveDate) {
        if extraction.date.is_none() {
            extraction.date = Some(format_date(today));
        }
        if extraction.time_range.is_none() {
            extraction.time_range = Some(self.settings.default_time_range.clone());
        }
    }

    pub fn generate_query(&self, request: &ProcessedRequest) -> DatabaseQuery {
        DatabaseQuery::from_request(request)
    }

    pub fn validate_input(&self, extraction: &mut ExtractionResult) -> ValidationReport {
        validate_extraction(extraction, self.clock.today(), &self.settings)
    }
}

impl IntentEngine for RuleEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Rule
    }

    fn process(&self, text: &str) -> Result<ProcessedRequest, InferenceError> {
        Ok(RuleEngine::process(self, text))
    }

    fn validate_input(&self, extraction: &mut ExtractionResult) -> ValidationReport {
        RuleEngine::validate_input(self, extraction)
    }
}
