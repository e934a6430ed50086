//! AI recommendation delegate
//!
//! Builds a natural-language prompt from the current analytics snapshot,
//! sends it to an OpenAI-compatible completion endpoint and parses the
//! reply back into [`Recommendation`]s. Transport and status failures
//! surface as recoverable errors so the engine can apply its fallback
//! policy; a reply that merely fails to parse is preserved as a single
//! raw-text recommendation instead of being dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Priority, Recommendation, RecommendationCategory};
use crate::analytics::Analytics;
use crate::utils::{AppError, AppResult};

/// External completion provider: prompt in, free text out
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

// ========== OpenAI-compatible client ==========

pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl AiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Self {
        // The timeout bounds the whole call; a timed-out provider is treated
        // like any other provider failure
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client builder failed ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl RecommendationProvider for AiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::remote(format!(
                "AI provider returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::remote(format!("AI response parse failed: {}", e)))?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::remote("AI provider returned no completion"))
    }
}

// ========== Prompt and response handling ==========

/// Build the analysis prompt for the provider
pub fn build_prompt(analytics: &Analytics) -> String {
    let mut top_lines = String::new();
    for (rank, product) in analytics.top_products.iter().enumerate() {
        top_lines.push_str(&format!(
            "{}. {} (sales {}, {:.1}% of revenue)\n",
            rank + 1,
            product.name,
            product.total_sales,
            product.percentage_of_revenue
        ));
    }
    if top_lines.is_empty() {
        top_lines.push_str("none yet\n");
    }

    format!(
        "You are a retail sales analyst. Current metrics:\n\
         Total revenue: {}\n\
         Revenue change over the last minute: {:.1}%\n\
         Top products:\n{}\n\
         Reply with ONLY a JSON array of recommendation objects, each with \
         fields: id, title, description, category (one of promotion, pricing, \
         inventory, strategy, seasonal, ai), priority (low, medium, high) and \
         expectedImpact.",
        analytics.total_revenue, analytics.revenue_change_percent, top_lines
    )
}

/// Parse a provider reply as a JSON array of recommendations.
///
/// A surrounding markdown code fence is stripped first; anything that still
/// fails strict parsing returns `None` and the caller keeps the raw text.
pub fn parse_recommendations(text: &str) -> Option<Vec<Recommendation>> {
    let trimmed = strip_code_fence(text.trim());
    serde_json::from_str::<Vec<Recommendation>>(trimmed).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag after the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Wrap an unparseable reply so operators still see it
pub fn raw_fallback(text: String) -> Recommendation {
    Recommendation {
        id: "ai-raw".to_string(),
        title: "AI Analysis".to_string(),
        description: text,
        category: RecommendationCategory::Ai,
        priority: Priority::High,
        expected_impact: "Needs manual review".to_string(),
    }
}
