use std::process::ExitCode;
use std::sync::Arc;

use volunteer_intent::config::{self, EngineConfig, ExtractionSettings};
use volunteer_intent::{Clock, HybridEngine, SystemClock};

const SAMPLE_REQUESTS: &[&str] = &[
    "我和我朋友都是16岁，我和他要做一个在4月3号上午的志愿活动，我们想做环保类型的",
    "我想一个人参加明天下午的社区服务活动，我18岁了",
    "我们三个人想在4月3号做一些环保相关的事情，都是大学生",
    "明天我想和朋友一起参加敬老院的志愿活动",
];

fn main() -> ExitCode {
    volunteer_intent::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let (engine_config, errors) = EngineConfig::from_env();
    for error in &errors {
        tracing::warn!(%error, "Ignoring unreadable configuration value");
    }
    tracing::info!(config = %engine_config.summary(), "Configuration loaded");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let engine = HybridEngine::from_config(&engine_config, ExtractionSettings::shared(), clock);
    tracing::info!(info = ?engine.engine_info(), "Engine ready");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs: Vec<&str> = if args.is_empty() {
        SAMPLE_REQUESTS.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for text in inputs {
        let request = engine.process(text);
        let query = engine.generate_query(&request);
        let output = serde_json::json!({
            "request": request,
            "query": query,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("Failed to render result: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
