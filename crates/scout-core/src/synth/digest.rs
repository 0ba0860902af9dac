//! Offline synthesizer that summarizes insights without a language model.

use super::Synthesizer;
use crate::Result;
use async_trait::async_trait;
use scout_types::{Insight, InsightCategory, SynthesizedAnswer};
use std::collections::{HashMap, HashSet};

/// Insights quoted in a digest answer.
const MAX_CITED: usize = 5;

/// Builds a markdown digest of the strongest insights and asks about the
/// research categories nothing covers yet.
#[derive(Debug, Clone, Default)]
pub struct DigestSynthesizer;

impl DigestSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the answer synchronously.
    pub fn compose(&self, query_content: &str, insights: &[Insight]) -> SynthesizedAnswer {
        let entity = dominant_entity(insights);

        if insights.is_empty() {
            let answer = format!(
                "There is not enough information to answer **{}** yet: no insights have been \
                 collected for this query.",
                query_content.trim()
            );
            return SynthesizedAnswer::bounded(
                &answer,
                vec![
                    "Which company should this research focus on?".to_string(),
                    "Which sources should be searched first?".to_string(),
                ],
            );
        }

        let mut ranked: Vec<&Insight> = insights.iter().collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut answer = format!(
            "Based on {} collected insight{} about {}:\n",
            insights.len(),
            if insights.len() == 1 { "" } else { "s" },
            entity
        );
        for insight in ranked.iter().take(MAX_CITED) {
            answer.push_str(&format!(
                "\n- **{}** ({} impact, {:.0}% confidence): {} [source]({})",
                insight.title.trim(),
                insight.impact,
                insight.confidence * 100.0,
                first_sentence(&insight.content),
                insight.source.trim()
            ));
        }
        if insights.len() > MAX_CITED {
            answer.push_str(&format!(
                "\n\n{} lower-confidence insights omitted.",
                insights.len() - MAX_CITED
            ));
        }

        let covered: HashSet<InsightCategory> = insights
            .iter()
            .filter_map(|i| InsightCategory::from_label(&i.category))
            .collect();
        let questions = InsightCategory::ALL
            .into_iter()
            .filter(|c| !covered.contains(c))
            .map(|c| follow_up_for(c, &entity));

        SynthesizedAnswer::bounded(&answer, questions)
    }
}

#[async_trait]
impl Synthesizer for DigestSynthesizer {
    fn name(&self) -> &'static str {
        "digest"
    }

    async fn synthesize(&self, query_content: &str, insights: &[Insight]) -> Result<SynthesizedAnswer> {
        Ok(self.compose(query_content, insights))
    }
}

/// Most frequent non-empty entity, ties broken by first appearance.
fn dominant_entity(insights: &[Insight]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for insight in insights {
        let entity = insight.entity.trim();
        if entity.is_empty() {
            continue;
        }
        let count = counts.entry(entity).or_insert(0);
        if *count == 0 {
            order.push(entity);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for entity in order {
        let count = counts[entity];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((entity, count));
        }
    }
    best.map(|(e, _)| e.to_string())
        .unwrap_or_else(|| "the company".to_string())
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    match text.find(". ") {
        Some(idx) => &text[..=idx],
        None => text,
    }
}

fn follow_up_for(category: InsightCategory, entity: &str) -> String {
    match category {
        InsightCategory::CompanyOverview => format!("What is the background and history of {}?", entity),
        InsightCategory::ProductsServices => format!("What products and services does {} offer?", entity),
        InsightCategory::CompetitivePosition => {
            format!("How does {} compare with its main competitors?", entity)
        }
        InsightCategory::MarketAnalysis => format!("Which market trends affect {} most?", entity),
        InsightCategory::FinancialPerformance => {
            format!("How has {} performed financially in recent years?", entity)
        }
        InsightCategory::ManagementLeadership => format!("Who leads {} and how effective are they?", entity),
        InsightCategory::StrategyDirection => format!("What strategic direction is {} pursuing?", entity),
        InsightCategory::BusinessModel => format!("How does {} make money?", entity),
        InsightCategory::IndustryInsights => {
            format!("Which industry developments could affect {}?", entity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FixtureInsightSource, InsightSource};
    use proptest::prelude::*;
    use scout_types::{word_count, Impact, NewInsight, MAX_ANSWER_WORDS, MAX_FOLLOW_UPS, MAX_QUESTION_WORDS};
    use uuid::Uuid;

    fn materialize(new: Vec<NewInsight>) -> Vec<Insight> {
        let query_id = Uuid::now_v7();
        new.into_iter().map(|n| Insight::from_new(query_id, n)).collect()
    }

    #[test]
    fn test_empty_insights_degrade() {
        let answer = DigestSynthesizer::new().compose("Who is Bezos", &[]);
        assert!(answer.answer.contains("not enough information"));
        assert!(answer.answer.contains("Who is Bezos"));
        assert!(answer.follow_up_questions.len() <= MAX_FOLLOW_UPS);
    }

    #[test]
    fn test_fixture_digest() {
        let insights = materialize(FixtureInsightSource.generate("Who is Bezos"));
        let answer = DigestSynthesizer::new().compose("Who is Bezos", &insights);

        assert!(answer.answer.starts_with("Based on 2 collected insights about Amazon"));
        let overview = answer.answer.find("leading provider").unwrap();
        let logistics = answer.answer.find("competitive edge").unwrap();
        assert!(overview < logistics, "higher confidence first");
        assert!(answer.answer.contains("[source](https://www.amazon.com/)"));
        assert_eq!(
            answer.follow_up_questions,
            vec![
                "What products and services does Amazon offer?".to_string(),
                "Which market trends affect Amazon most?".to_string(),
            ]
        );
    }

    #[test]
    fn test_dominant_entity_falls_back() {
        let mut insights = materialize(FixtureInsightSource.generate("q"));
        for i in &mut insights {
            i.entity = "  ".to_string();
        }
        assert_eq!(dominant_entity(&insights), "the company");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("One. Two. Three"), "One.");
        assert_eq!(first_sentence("No stop"), "No stop");
    }

    fn arb_insight() -> impl Strategy<Value = NewInsight> {
        (
            "[a-zA-Z ]{1,80}",
            "[a-zA-Z .]{1,400}",
            "[a-zA-Z]{0,12}",
            0.0f64..=1.0,
        )
            .prop_map(|(title, content, entity, confidence)| NewInsight {
                title,
                category: "Uncategorized".to_string(),
                content,
                source: "https://example.com/".to_string(),
                impact: Impact::Low,
                confidence,
                entity,
                created_at: None,
            })
    }

    proptest! {
        #[test]
        fn prop_digest_respects_bounds(
            query in "[a-zA-Z ?]{0,200}",
            batch in prop::collection::vec(arb_insight(), 0..12),
        ) {
            let insights = materialize(batch);
            let answer = DigestSynthesizer::new().compose(&query, &insights);
            prop_assert!(word_count(&answer.answer) <= MAX_ANSWER_WORDS);
            prop_assert!(answer.follow_up_questions.len() <= MAX_FOLLOW_UPS);
            for q in &answer.follow_up_questions {
                prop_assert!(word_count(q) <= MAX_QUESTION_WORDS);
            }
        }
    }
}
