//! Natural-language narrative of the metrics from a generative-text service.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::currency::{format_currency, to_fixed};
use crate::error::InvestDashError;
use crate::metrics::{FinancialMetrics, PAYBACK_NOT_RECOVERED};
use crate::record::InvestmentRecord;
use crate::InvestDashResult;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Message shown to the user in place of the narrative when the request fails.
pub const INSIGHT_FALLBACK_MESSAGE: &str = "Erro ao conectar com a IA. Verifique sua conexão.";

/// Returned when the service answers with no text.
pub const EMPTY_INSIGHT_MESSAGE: &str = "Sem insights no momento.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL; the request goes to `{endpoint}/{model}:generateContent`.
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// A generated narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Concatenated text of the first candidate, if any.
fn extract_text(body: &str) -> InvestDashResult<Option<String>> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .filter(|t| !t.trim().is_empty());
    Ok(text)
}

/// Build the analyst prompt for the current scenario.
pub fn build_prompt(record: &InvestmentRecord, metrics: &FinancialMetrics) -> String {
    let currency = record.currency;
    let payback = if metrics.payback == PAYBACK_NOT_RECOVERED {
        "Inviável no período".to_string()
    } else {
        format!("{} períodos", to_fixed(metrics.payback, 1))
    };
    let roi = metrics
        .roi
        .map(|r| format!("{}%", to_fixed(r, 2)))
        .unwrap_or_else(|| "indefinido".to_string());
    let pi = metrics
        .profitability_index
        .map(|p| to_fixed(p, 2))
        .unwrap_or_else(|| "indefinido".to_string());

    format!(
        "Atue como um analista financeiro sênior da Applemar Invest, focado no mercado de Angola e Internacional.\n\
         Analise os dados financeiros abaixo e forneça uma síntese executiva de alto nível.\n\
         \n\
         Contexto Financeiro ({code}):\n\
         - Investimento: {investment}\n\
         - VPL: {npv}\n\
         - TIR: {irr}% (TMA de {rate}%)\n\
         - Payback: {payback}\n\
         - ROI: {roi}\n\
         - Índice de Lucratividade: {pi}\n\
         \n\
         Se a moeda for AOA, considere o contexto inflacionário e a taxa de câmbio se apropriado.\n\
         Seja elegante, direto e use um tom de consultoria premium. Limite-se a 3 parágrafos curtos.\n\
         Responda em Português (PT-AO/PT-BR).",
        code = currency.code(),
        investment = format_currency(record.initial_investment, currency),
        npv = format_currency(metrics.npv, currency),
        irr = to_fixed(metrics.irr, 2),
        rate = record.discount_rate.normalize(),
    )
}

/// Client for the generate-content endpoint. Does not retry.
#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    config: InsightConfig,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> InvestDashResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    pub async fn request_insight(
        &self,
        record: &InvestmentRecord,
        metrics: &FinancialMetrics,
    ) -> InvestDashResult<Insight> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                InvestDashError::MissingCredential("no API key configured for the insight service".into())
            })?;

        let prompt = build_prompt(record, metrics);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, "requesting narrative insight");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::error!(status = status.as_u16(), %message, "insight service error");
            return Err(InvestDashError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let narrative = extract_text(&text)?.unwrap_or_else(|| EMPTY_INSIGHT_MESSAGE.to_string());
        Ok(Insight {
            text: narrative,
            model: self.config.model.clone(),
            generated_at: Utc::now(),
        })
    }

    /// The narrative text for the record and its metrics.
    pub async fn request_analysis(
        &self,
        record: &InvestmentRecord,
        metrics: &FinancialMetrics,
    ) -> InvestDashResult<String> {
        self.request_insight(record, metrics).await.map(|i| i.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::get_full_metrics;

    #[test]
    fn test_prompt_embeds_formatted_metrics() {
        let record = InvestmentRecord::default();
        let metrics = get_full_metrics(&record);
        let prompt = build_prompt(&record, &metrics);
        assert!(prompt.contains("Contexto Financeiro (AOA)"));
        assert!(prompt.contains("Investimento: 5 000 000,00 Kz"));
        assert!(prompt.contains("VPL: 1 239 726,50 Kz"));
        assert!(prompt.contains("TIR: 23.29% (TMA de 15%)"));
        assert!(prompt.contains("Payback: 3.2 períodos"));
        assert!(prompt.contains("ROI: 100.00%"));
        assert!(prompt.contains("Índice de Lucratividade: 1.25"));
    }

    #[test]
    fn test_prompt_payback_not_recovered() {
        let record = InvestmentRecord::default().with_initial_investment(rust_decimal_macros::dec!(1000000000));
        let metrics = get_full_metrics(&record);
        assert!(build_prompt(&record, &metrics).contains("Payback: Inviável no período"));
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Olá "},{"text":"mundo"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap().as_deref(), Some("Olá mundo"));
        assert_eq!(extract_text(r#"{"candidates":[]}"#).unwrap(), None);
        assert!(extract_text("not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = InsightClient::new(InsightConfig::default()).unwrap();
        let record = InvestmentRecord::default();
        let metrics = get_full_metrics(&record);
        let err = client.request_analysis(&record, &metrics).await.unwrap_err();
        assert!(matches!(err, InvestDashError::MissingCredential(_)));
    }
}
