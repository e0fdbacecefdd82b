pub mod lexical;
pub mod extractors;
pub mod repair;
pub mod standardize;
pub mod validation;
pub mod engine;
pub mod rules;
pub mod inference;
pub mod hybrid;

pub use engine::IntentEngine;
pub use hybrid::HybridEngine;
pub use inference::{InferenceError, LlmEngine};
pub use rules::RuleEngine;
