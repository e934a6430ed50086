//! Rule-based recommendation catalog
//!
//! Pure classification over an analytics snapshot. Each rule is evaluated
//! independently and every applicable rule fires, in catalog order. Ids are
//! stable per rule so identical inputs always produce identical output.

use super::weather::WeatherKind;
use super::{Priority, Recommendation, RecommendationCategory};
use crate::analytics::Analytics;

/// A top product above this revenue share gets its own promotion push
const PROMOTION_SHARE_THRESHOLD: f64 = 30.0;
/// Momentum above this triggers the inventory build-up suggestion
const SURGE_THRESHOLD: f64 = 50.0;

/// Evaluate the full rule catalog against a snapshot
pub fn evaluate(analytics: &Analytics, weather: WeatherKind) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    // 1. Top-product promotion
    if let Some(top) = analytics.top_products.first()
        && top.percentage_of_revenue > PROMOTION_SHARE_THRESHOLD
    {
        recommendations.push(Recommendation {
            id: "1".to_string(),
            title: format!("Promote {}", top.name),
            description: format!(
                "{} is showing strong sales momentum with {:.1}% of total revenue. \
                 Consider a flash sale to boost revenue further.",
                top.name, top.percentage_of_revenue
            ),
            category: RecommendationCategory::Promotion,
            priority: Priority::High,
            expected_impact: format!("Expected 25% increase in {} sales", top.name),
        });
    }

    // 2. Bundle opportunity
    if let [first, second, ..] = analytics.top_products.as_slice() {
        recommendations.push(Recommendation {
            id: "2".to_string(),
            title: "Bundle Opportunity".to_string(),
            description: format!(
                "Create a bundle offer combining {} and {} to increase average order value.",
                first.name, second.name
            ),
            category: RecommendationCategory::Pricing,
            priority: Priority::Medium,
            expected_impact: "Potential 15% increase in average order value".to_string(),
        });
    }

    // 3 / 4. Revenue recovery vs growth capitalization, mutually exclusive
    if analytics.revenue_change_percent < 0.0 {
        recommendations.push(Recommendation {
            id: "3".to_string(),
            title: "Revenue Recovery Strategy".to_string(),
            description: format!(
                "Revenue has decreased by {:.1}% in the last minute. \
                 Consider implementing promotional campaigns or discounts.",
                analytics.revenue_change_percent.abs()
            ),
            category: RecommendationCategory::Strategy,
            priority: Priority::High,
            expected_impact: "Expected 20% revenue recovery within next hour".to_string(),
        });
    } else if analytics.revenue_change_percent > SURGE_THRESHOLD {
        recommendations.push(Recommendation {
            id: "4".to_string(),
            title: "Capitalize on Momentum".to_string(),
            description: format!(
                "Revenue is surging with {:.1}% growth. \
                 Consider increasing inventory for high-demand products.",
                analytics.revenue_change_percent
            ),
            category: RecommendationCategory::Inventory,
            priority: Priority::Medium,
            expected_impact: "Prevent stockouts and maintain growth trajectory".to_string(),
        });
    }

    // 5. Seasonal, exactly one per snapshot
    recommendations.push(seasonal(weather));

    recommendations
}

fn seasonal(weather: WeatherKind) -> Recommendation {
    match weather {
        WeatherKind::Hot => Recommendation {
            id: "5".to_string(),
            title: "Hot Weather Promotion".to_string(),
            description: "Current weather conditions favor promoting cooling products \
                          and summer accessories."
                .to_string(),
            category: RecommendationCategory::Seasonal,
            priority: Priority::Medium,
            expected_impact: "Potential 20% boost in seasonal product sales".to_string(),
        },
        WeatherKind::Cold => Recommendation {
            id: "6".to_string(),
            title: "Cold Weather Strategy".to_string(),
            description: "Weather conditions suggest promoting warm beverages \
                          and winter accessories."
                .to_string(),
            category: RecommendationCategory::Seasonal,
            priority: Priority::Medium,
            expected_impact: "Expected 18% increase in winter product sales".to_string(),
        },
        WeatherKind::Rainy => Recommendation {
            id: "7".to_string(),
            title: "Rainy Day Specials".to_string(),
            description: "Rainy weather creates opportunities for indoor entertainment \
                          and comfort products."
                .to_string(),
            category: RecommendationCategory::Seasonal,
            priority: Priority::Low,
            expected_impact: "Potential 12% boost in indoor product categories".to_string(),
        },
        WeatherKind::Other => Recommendation {
            id: "8".to_string(),
            title: "Optimize Product Mix".to_string(),
            description: "Current conditions are ideal for promoting outdoor \
                          and recreational products."
                .to_string(),
            category: RecommendationCategory::Seasonal,
            priority: Priority::Low,
            expected_impact: "Expected 10% increase in outdoor product sales".to_string(),
        },
    }
}
