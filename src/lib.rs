pub mod clock;
pub mod config;
pub mod models;
pub mod pipeline;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, ExtractionSettings};
pub use models::{ActivityCategory, DatabaseQuery, EngineKind, ExtractionResult, ProcessedRequest};
pub use pipeline::{HybridEngine, IntentEngine, RuleEngine};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
