//! Insight sources: where the initial batch of insights for a query comes from.

use scout_types::{Impact, InsightCategory, NewInsight};
use serde::Deserialize;

/// Produces candidate insights for a query.
pub trait InsightSource: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Generate insights for the given question text.
    fn generate(&self, query_content: &str) -> Vec<NewInsight>;
}

/// Configured choice of insight source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    /// Fixed research fixture.
    #[default]
    Fixture,
    /// No seeding; queries start empty.
    None,
}

impl SeedSource {
    pub fn build(self) -> Box<dyn InsightSource> {
        match self {
            SeedSource::Fixture => Box::new(FixtureInsightSource),
            SeedSource::None => Box::new(EmptyInsightSource),
        }
    }
}

/// Returns the same two Amazon findings for every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureInsightSource;

impl InsightSource for FixtureInsightSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn generate(&self, _query_content: &str) -> Vec<NewInsight> {
        vec![
            NewInsight {
                title: "Amazon is a leading provider of e-commerce solutions".to_string(),
                category: InsightCategory::CompanyOverview.label().to_string(),
                content: "Amazon, founded by Jeff Bezos, has revolutionized the e-commerce industry. \
                          With its vast network and advanced logistics systems, it provides a wide \
                          range of products and services to customers around the globe."
                    .to_string(),
                source: "https://www.amazon.com/".to_string(),
                impact: Impact::High,
                confidence: 0.95,
                entity: "Amazon".to_string(),
                created_at: None,
            },
            NewInsight {
                title: "Amazon has a competitive edge due to its advanced logistics systems"
                    .to_string(),
                category: InsightCategory::CompetitivePosition.label().to_string(),
                content: "Amazon's advanced logistics systems, including its use of robotics and AI, \
                          give it a competitive edge in the e-commerce industry. This allows Amazon \
                          to deliver products faster and more efficiently than its competitors."
                    .to_string(),
                source: "https://www.amazon.com/".to_string(),
                impact: Impact::Medium,
                confidence: 0.85,
                entity: "Amazon".to_string(),
                created_at: None,
            },
        ]
    }
}

/// Seeds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyInsightSource;

impl InsightSource for EmptyInsightSource {
    fn name(&self) -> &'static str {
        "none"
    }

    fn generate(&self, _query_content: &str) -> Vec<NewInsight> {
        Vec::new()
    }
}
