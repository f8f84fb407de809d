use colored::Colorize;
use serde_json::{json, Value};

use investdash_core::insight::{InsightClient, INSIGHT_FALLBACK_MESSAGE};
use investdash_core::metrics::get_full_metrics;

use super::Session;
use crate::settings::AppConfig;

/// Request a narrative for the saved scenario.
///
/// Any failure is reported in place of the narrative; the command itself
/// still succeeds.
pub async fn run_insight(session: &Session, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let record = session.load();
    let metrics = get_full_metrics(&record);

    eprintln!("{}", "Consulting AI analyst...".dimmed());

    let outcome = match InsightClient::new(config.insight_config()) {
        Ok(client) => client.request_insight(&record, &metrics).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(insight) => Ok(json!({
            "narrative": insight.text,
            "model": insight.model,
            "generated_at": insight.generated_at,
        })),
        Err(e) => {
            tracing::error!(error = %e, "insight request failed");
            Ok(json!({
                "narrative": INSIGHT_FALLBACK_MESSAGE,
                "error": e.to_string(),
            }))
        }
    }
}
