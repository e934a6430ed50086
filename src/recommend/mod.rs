//! Recommendation engine
//!
//! Classifies the current analytics snapshot into actionable suggestions.
//! Three sourcing modes, selected by configuration:
//!
//! - `rules`: the built-in rule catalog only
//! - `ai`: the external provider, falling back to the rule catalog on any
//!   provider failure
//! - `hybrid`: rule catalog always, AI suggestions appended best-effort
//!
//! `recommend` never fails; provider errors stop at this module.

pub mod ai;
pub mod rules;
pub mod weather;

pub use ai::{AiClient, RecommendationProvider};
pub use weather::{FixedSignal, OpenWeatherSignal, RandomSignal, SeasonalSignal, WeatherKind};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analytics::Analytics;
use crate::utils::{AppError, AppResult};

/// An actionable suggestion derived from the current metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Stable per rule: identical inputs yield the same id
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub expected_impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Promotion,
    Pricing,
    Inventory,
    Strategy,
    Seasonal,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Sourcing strategy, selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecommendationMode {
    #[default]
    Rules,
    Ai,
    Hybrid,
}

impl RecommendationMode {
    /// Parse a configuration value; unknown values fall back to `Rules`
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "rules" | "rule-based" => Self::Rules,
            "ai" => Self::Ai,
            "hybrid" => Self::Hybrid,
            other => {
                tracing::warn!(mode = other, "Unknown recommendation mode, using rules");
                Self::Rules
            }
        }
    }
}

/// The engine. Pure given a snapshot, the configured mode and the injected
/// collaborators.
pub struct Recommender {
    mode: RecommendationMode,
    provider: Option<Arc<dyn RecommendationProvider>>,
    signal: Arc<dyn SeasonalSignal>,
}

impl Recommender {
    pub fn new(
        mode: RecommendationMode,
        provider: Option<Arc<dyn RecommendationProvider>>,
        signal: Arc<dyn SeasonalSignal>,
    ) -> Self {
        Self {
            mode,
            provider,
            signal,
        }
    }

    /// Produce recommendations for a snapshot. Never fails.
    pub async fn recommend(&self, analytics: &Analytics) -> Vec<Recommendation> {
        // A failing seasonal signal degrades to the neutral branch so the
        // seasonal rule still fires exactly once
        let weather = match self.signal.current_condition().await {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(error = %e, "Seasonal signal unavailable, using neutral condition");
                WeatherKind::Other
            }
        };

        let rule_based = rules::evaluate(analytics, weather);

        match self.mode {
            RecommendationMode::Rules => rule_based,
            RecommendationMode::Ai => match self.from_provider(analytics).await {
                Ok(from_ai) => from_ai,
                Err(e) => {
                    tracing::warn!(error = %e, "AI provider failed, falling back to rule catalog");
                    rule_based
                }
            },
            RecommendationMode::Hybrid => {
                let mut combined = rule_based;
                match self.from_provider(analytics).await {
                    Ok(from_ai) => combined.extend(from_ai),
                    Err(e) => {
                        tracing::warn!(error = %e, "AI provider failed, keeping rule catalog only");
                    }
                }
                combined
            }
        }
    }

    /// Ask the external provider for suggestions.
    ///
    /// Transport, status and timeout failures propagate as recoverable
    /// errors; an unparseable reply is preserved as a single raw-text
    /// recommendation.
    async fn from_provider(&self, analytics: &Analytics) -> AppResult<Vec<Recommendation>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AppError::remote("AI provider not configured"))?;

        let reply = provider.complete(&ai::build_prompt(analytics)).await?;

        Ok(match ai::parse_recommendations(&reply) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!("AI reply did not parse as recommendations, keeping raw text");
                vec![ai::raw_fallback(reply)]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct FailingProvider;

    #[async_trait]
    impl RecommendationProvider for FailingProvider {
        async fn complete(&self, _prompt: &str) -> AppResult<String> {
            Err(AppError::remote("connection timed out"))
        }
    }

    struct CannedProvider(String);

    #[async_trait]
    impl RecommendationProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> AppResult<String> {
            Ok(self.0.clone())
        }
    }

    fn snapshot() -> Analytics {
        Analytics {
            total_revenue: Decimal::from(500),
            total_orders: 20,
            top_products: vec![crate::analytics::TopProduct {
                name: "Coffee Deluxe".to_string(),
                total_sales: Decimal::from(250),
                quantity_sold: 60,
                percentage_of_revenue: 50.0,
            }],
            recent_orders: vec![],
            revenue_change_percent: 10.0,
            orders_in_last_minute: 2,
        }
    }

    fn fixed_signal() -> Arc<dyn SeasonalSignal> {
        Arc::new(FixedSignal(WeatherKind::Hot))
    }

    const VALID_REPLY: &str = r#"[{"id":"a1","title":"Cross-sell","description":"Pair drinks with pastries","category":"pricing","priority":"medium","expectedImpact":"+8% basket size"}]"#;

    #[tokio::test]
    async fn rules_mode_never_touches_the_provider() {
        let engine = Recommender::new(RecommendationMode::Rules, None, fixed_signal());
        let recommendations = engine.recommend(&snapshot()).await;

        // Promotion (50% > 30) and the hot-weather seasonal entry
        assert!(recommendations.iter().any(|r| r.id == "1"));
        assert!(recommendations.iter().any(|r| r.id == "5"));
    }

    #[tokio::test]
    async fn ai_mode_returns_provider_output() {
        let engine = Recommender::new(
            RecommendationMode::Ai,
            Some(Arc::new(CannedProvider(VALID_REPLY.to_string()))),
            fixed_signal(),
        );
        let recommendations = engine.recommend(&snapshot()).await;

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].id, "a1");
    }

    #[tokio::test]
    async fn ai_mode_falls_back_to_rules_on_provider_failure() {
        let engine = Recommender::new(
            RecommendationMode::Ai,
            Some(Arc::new(FailingProvider)),
            fixed_signal(),
        );
        let recommendations = engine.recommend(&snapshot()).await;

        // Provider failure is invisible to the caller: rule output instead
        assert!(!recommendations.is_empty());
        assert!(recommendations.iter().any(|r| r.id == "1"));
        assert!(recommendations.iter().all(|r| r.category != RecommendationCategory::Ai));
    }

    #[tokio::test]
    async fn ai_mode_without_provider_behaves_like_failure() {
        let engine = Recommender::new(RecommendationMode::Ai, None, fixed_signal());
        let recommendations = engine.recommend(&snapshot()).await;
        assert!(recommendations.iter().any(|r| r.id == "1"));
    }

    #[tokio::test]
    async fn hybrid_mode_appends_ai_after_rules() {
        let engine = Recommender::new(
            RecommendationMode::Hybrid,
            Some(Arc::new(CannedProvider(VALID_REPLY.to_string()))),
            fixed_signal(),
        );
        let recommendations = engine.recommend(&snapshot()).await;

        let first_rule = recommendations.iter().position(|r| r.id == "1").unwrap();
        let ai_entry = recommendations.iter().position(|r| r.id == "a1").unwrap();
        assert!(first_rule < ai_entry);
    }

    #[tokio::test]
    async fn hybrid_mode_keeps_rules_when_provider_fails() {
        let engine = Recommender::new(
            RecommendationMode::Hybrid,
            Some(Arc::new(FailingProvider)),
            fixed_signal(),
        );
        let recommendations = engine.recommend(&snapshot()).await;
        assert!(recommendations.iter().any(|r| r.id == "1"));
        assert!(recommendations.iter().any(|r| r.id == "5"));
    }

    #[tokio::test]
    async fn unparseable_reply_is_kept_as_raw_recommendation() {
        let engine = Recommender::new(
            RecommendationMode::Ai,
            Some(Arc::new(CannedProvider("just wing it".to_string()))),
            fixed_signal(),
        );
        let recommendations = engine.recommend(&snapshot()).await;

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].id, "ai-raw");
        assert_eq!(recommendations[0].description, "just wing it");
        assert_eq!(recommendations[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn failing_signal_degrades_to_neutral_seasonal_entry() {
        struct FailingSignal;

        #[async_trait]
        impl SeasonalSignal for FailingSignal {
            async fn current_condition(&self) -> AppResult<WeatherKind> {
                Err(AppError::remote("weather api down"))
            }
        }

        let engine = Recommender::new(RecommendationMode::Rules, None, Arc::new(FailingSignal));
        let recommendations = engine.recommend(&snapshot()).await;

        // Seasonal rule still fires, on the neutral branch
        assert!(recommendations.iter().any(|r| r.id == "8"));
    }

    #[test]
    fn mode_parsing_defaults_to_rules() {
        assert_eq!(RecommendationMode::parse("rules"), RecommendationMode::Rules);
        assert_eq!(RecommendationMode::parse("AI"), RecommendationMode::Ai);
        assert_eq!(RecommendationMode::parse("hybrid"), RecommendationMode::Hybrid);
        assert_eq!(RecommendationMode::parse("banana"), RecommendationMode::Rules);
    }
}
