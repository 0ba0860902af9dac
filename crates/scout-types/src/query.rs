//! Query and insight records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stored natural-language research question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Time-sortable identifier, assigned once at creation.
    pub id: Uuid,
    /// The question text.
    pub content: String,
    /// When the query was created.
    pub created_at: DateTime<Utc>,
    /// Advances on every content edit and every insight change.
    pub updated_at: DateTime<Utc>,
}

impl Query {
    /// Create a new query stamped with the current time.
    pub fn new(content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Qualitative impact level of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }

    /// Parse the stored column value (case-insensitive).
    pub fn from_db(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(Impact::High),
            "medium" => Some(Impact::Medium),
            "low" => Some(Impact::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known research categories.
///
/// Stored insights keep their category as free text; these are the
/// canonical labels used when the system produces insights or questions
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightCategory {
    CompanyOverview,
    ProductsServices,
    CompetitivePosition,
    MarketAnalysis,
    FinancialPerformance,
    ManagementLeadership,
    StrategyDirection,
    BusinessModel,
    IndustryInsights,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 9] = [
        InsightCategory::CompanyOverview,
        InsightCategory::ProductsServices,
        InsightCategory::CompetitivePosition,
        InsightCategory::MarketAnalysis,
        InsightCategory::FinancialPerformance,
        InsightCategory::ManagementLeadership,
        InsightCategory::StrategyDirection,
        InsightCategory::BusinessModel,
        InsightCategory::IndustryInsights,
    ];

    /// Human-readable label, as stored on insights.
    pub fn label(&self) -> &'static str {
        match self {
            InsightCategory::CompanyOverview => "Company Overview",
            InsightCategory::ProductsServices => "Products & Services",
            InsightCategory::CompetitivePosition => "Competitive Position",
            InsightCategory::MarketAnalysis => "Market Analysis",
            InsightCategory::FinancialPerformance => "Financial Performance",
            InsightCategory::ManagementLeadership => "Management & Leadership",
            InsightCategory::StrategyDirection => "Strategy & Direction",
            InsightCategory::BusinessModel => "Business Model",
            InsightCategory::IndustryInsights => "Industry Insights",
        }
    }

    /// Match a free-text category against the known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = normalize_label(label);
        Self::ALL
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
    }
}

/// Lowercased words of `label` with standalone "and" dropped, so that
/// "Products & Services", "products and services" and "PRODUCTS_SERVICES"
/// compare equal.
fn normalize_label(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| !word.is_empty() && word != "and")
        .collect()
}

/// A structured finding attached to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    /// URL or citation.
    pub source: String,
    pub impact: Impact,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Subject of the finding, e.g. a company name.
    pub entity: String,
    pub created_at: DateTime<Utc>,
    /// Owning query.
    pub query_id: Uuid,
}

impl Insight {
    /// Materialize client-supplied fields as an insight owned by `query_id`.
    pub fn from_new(query_id: Uuid, new: NewInsight) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: new.title,
            category: new.category,
            content: new.content,
            source: new.source,
            impact: new.impact,
            confidence: new.confidence,
            entity: new.entity,
            created_at: new.created_at.unwrap_or_else(Utc::now),
            query_id,
        }
    }
}

/// Insight fields supplied by a client or an insight source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInsight {
    pub title: String,
    pub category: String,
    pub content: String,
    pub source: String,
    pub impact: Impact,
    pub confidence: f64,
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_ids_are_time_sortable() {
        let a = Query::new("first".into());
        let b = Query::new("second".into());
        assert!(a.id < b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_new_insight_accepts_lowercase_impact_and_extra_fields() {
        let new: NewInsight = serde_json::from_value(json!({
            "title": "t",
            "category": "Company Overview",
            "content": "c",
            "source": "https://example.com/",
            "impact": "medium",
            "date": "2024-05-01",
            "confidence": 0.5,
            "entity": "Example"
        }))
        .unwrap();
        assert_eq!(new.impact, Impact::Medium);
        assert!(new.created_at.is_none());
    }

    #[test]
    fn test_category_label_matching() {
        assert_eq!(
            InsightCategory::from_label("Company Overview"),
            Some(InsightCategory::CompanyOverview)
        );
        assert_eq!(
            InsightCategory::from_label("products and services"),
            Some(InsightCategory::ProductsServices)
        );
        assert_eq!(
            InsightCategory::from_label("STRATEGY_DIRECTION"),
            Some(InsightCategory::StrategyDirection)
        );
        assert_eq!(InsightCategory::from_label("Gossip"), None);
    }

    #[test]
    fn test_label_normalization_keeps_words_containing_and() {
        assert_eq!(normalize_label("Brand Landscape"), "brandlandscape");
        assert_eq!(normalize_label("Management & Leadership"), "managementleadership");
        assert_eq!(normalize_label("Supply and Demand"), "supplydemand");
        assert_eq!(InsightCategory::from_label("Brand Landscape"), None);
    }

    #[test]
    fn test_impact_from_db() {
        assert_eq!(Impact::from_db("High"), Some(Impact::High));
        assert_eq!(Impact::from_db("LOW"), Some(Impact::Low));
        assert_eq!(Impact::from_db("extreme"), None);
    }
}
