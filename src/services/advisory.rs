use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{AIInsight, InsightType, Product};

const INSIGHT_COUNT: usize = 3;

pub const FALLBACK_INSIGHT_TITLE: &str = "Stock Analysis Delayed";
pub const FALLBACK_INSIGHT_DESCRIPTION: &str =
    "Unable to reach the AI engine for live insights. Please check your stock manually.";
pub const EMPTY_RECOMMENDATION: &str =
    "I couldn't find a specific match, but I recommend checking our premium whiskey section.";
pub const FALLBACK_RECOMMENDATION: &str =
    "The sommelier is currently unavailable. Please browse our collection.";

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("No API key configured for the advisory service")]
    MissingApiKey,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Advisory service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Advisory service timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid advisory payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    /// When set, the service is asked for JSON matching this schema.
    pub response_schema: Option<Value>,
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AdvisoryError>;
}

/// Gemini `generateContent` over REST.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AdvisoryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }]
    });
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(self) -> String {
        self.candidates
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
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AdvisoryError> {
        let api_key = self.api_key.as_deref().ok_or(AdvisoryError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&request_body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(payload.text())
    }
}

/// Advisory boundary: builds prompts, calls the generator and turns every
/// failure into a fixed fallback. Never touches catalog, cart or ledger.
#[derive(Clone)]
pub struct AdvisoryClient {
    generator: Arc<dyn TextGenerator>,
    model: String,
    timeout: Duration,
}

impl AdvisoryClient {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
        }
    }

    /// Three insights on success, a single fallback alert otherwise.
    pub async fn get_inventory_insights(&self, products: &[Product]) -> Vec<AIInsight> {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: insights_prompt(products),
            response_schema: Some(insight_schema()),
        };

        match self.generate(request).await.and_then(|text| parse_insights(&text)) {
            Ok(insights) => insights,
            Err(e) => {
                warn!("Inventory insights unavailable: {}", e);
                vec![fallback_insight()]
            }
        }
    }

    pub async fn get_smart_recommendation(&self, query: &str, products: &[Product]) -> String {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: recommendation_prompt(query, products),
            response_schema: None,
        };

        match self.generate(request).await {
            Ok(text) if text.trim().is_empty() => EMPTY_RECOMMENDATION.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!("Recommendation unavailable: {}", e);
                FALLBACK_RECOMMENDATION.to_string()
            }
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, AdvisoryError> {
        tokio::time::timeout(self.timeout, self.generator.generate(request))
            .await
            .map_err(|_| AdvisoryError::Timeout(self.timeout))?
    }
}

pub fn fallback_insight() -> AIInsight {
    AIInsight {
        title: FALLBACK_INSIGHT_TITLE.to_string(),
        description: FALLBACK_INSIGHT_DESCRIPTION.to_string(),
        kind: InsightType::Alert,
    }
}

fn insights_prompt(products: &[Product]) -> String {
    let product_list = products
        .iter()
        .map(|p| format!("{} (Stock: {}, Price: ${})", p.name, p.stock, p.price))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert liquor store manager and sommelier. Analyze this inventory and provide {count} actionable business insights in JSON format.\n\n\
         Inventory Data:\n{product_list}\n\n\
         Requirements:\n\
         1. Provide exactly {count} insights.\n\
         2. One must be a restocking alert based on low stock.\n\
         3. One must be a cross-selling recommendation.\n\
         4. One must be a pricing or trend opportunity.\n",
        count = INSIGHT_COUNT,
        product_list = product_list,
    )
}

fn recommendation_prompt(query: &str, products: &[Product]) -> String {
    let product_list = products
        .iter()
        .map(|p| format!("{} - {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "A customer says: \"{}\". Based on the following inventory, recommend 1-2 bottles and explain why they match the request. Be elegant and knowledgeable.\n\n\
         Inventory:\n{}",
        query.trim(),
        product_list
    )
}

fn insight_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "type": {
                    "type": "STRING",
                    "enum": ["recommendation", "alert", "opportunity"]
                }
            },
            "required": ["title", "description", "type"]
        }
    })
}

/// Validates a generated insight payload field by field.
///
/// Fewer than three entries is an error; extra entries are dropped.
pub fn parse_insights(raw: &str) -> Result<Vec<AIInsight>, AdvisoryError> {
    let text = strip_code_fence(raw.trim());
    let text = if text.is_empty() { "[]" } else { text };

    let value: Value =
        serde_json::from_str(text).map_err(|e| AdvisoryError::InvalidPayload(e.to_string()))?;
    let entries = value
        .as_array()
        .ok_or_else(|| AdvisoryError::InvalidPayload("expected a JSON array".to_string()))?;

    let mut insights = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_insight(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    if insights.len() < INSIGHT_COUNT {
        return Err(AdvisoryError::InvalidPayload(format!(
            "expected {} insights, got {}",
            INSIGHT_COUNT,
            insights.len()
        )));
    }
    insights.truncate(INSIGHT_COUNT);
    Ok(insights)
}

fn parse_insight(index: usize, entry: &Value) -> Result<AIInsight, AdvisoryError> {
    let field = |name: &str| -> Result<String, AdvisoryError> {
        entry
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                AdvisoryError::InvalidPayload(format!("insight {} is missing string field `{}`", index, name))
            })
    };

    let kind = match field("type")?.as_str() {
        "recommendation" => InsightType::Recommendation,
        "alert" => InsightType::Alert,
        "opportunity" => InsightType::Opportunity,
        other => {
            return Err(AdvisoryError::InvalidPayload(format!(
                "insight {} has unknown type `{}`",
                index, other
            )))
        }
    };

    Ok(AIInsight {
        title: field("title")?,
        description: field("description")?,
        kind,
    })
}

// Models sometimes wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    text.strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(text)
}
