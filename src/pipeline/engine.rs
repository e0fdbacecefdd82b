use uuid::Uuid;

use super::inference::InferenceError;
use crate::clock::Clock;
use crate::models::enums::EngineKind;
use crate::models::request::{DatabaseQuery, ExtractionResult, ProcessedRequest, ValidationReport};

/// `processed_at` format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An extraction engine (allows swapping the rule and model paths).
pub trait IntentEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Extract, validate and tag one request.
    fn process(&self, text: &str) -> Result<ProcessedRequest, InferenceError>;

    /// Re-run validation on an extraction, nulling invalid fields in place.
    fn validate_input(&self, extraction: &mut ExtractionResult) -> ValidationReport;

    fn generate_query(&self, request: &ProcessedRequest) -> DatabaseQuery {
        DatabaseQuery::from_request(request)
    }
}

/// Wrap a validated extraction with its request metadata.
pub(crate) fn assemble_request(
    request_id: Uuid,
    raw_input: &str,
    extraction: ExtractionResult,
    validation: ValidationReport,
    engine: EngineKind,
    clock: &dyn Clock,
) -> ProcessedRequest {
    ProcessedRequest {
        request_id,
        raw_input: raw_input.to_string(),
        age: extraction.age.into(),
        party_size: extraction.party_size,
        date: extraction.date,
        time_range: extraction.time_range,
        activity_category: extraction.activity_category,
        validation,
        engine,
        processed_at: clock.now().format(TIMESTAMP_FORMAT).to_string(),
    }
}
