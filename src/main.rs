//! Prints the latest cached regime record as JSON. Never recomputes.

use dotenvy::dotenv;
use regimetrix::config::EngineConfig;
use regimetrix::core::bootstrap;
use regimetrix::logging;
use regimetrix::signals::engine::RegimeEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = EngineConfig::from_env();
    let signals = bootstrap::build_signal_store(&config).await?;
    let documents = bootstrap::build_document_store(&config).await?;
    let engine = RegimeEngine::new(signals, documents);

    match engine.get_regime().await {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => {
            tracing::info!("No regime record available yet");
            println!("null");
        }
    }

    Ok(())
}
