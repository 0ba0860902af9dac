//! Prompt text for answer synthesis.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scout_types::Insight;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(query|insights)\}").expect("Invalid placeholder regex"));

/// Default prompt for answer generation.
///
/// Placeholders: `{query}` is the question, `{insights}` the rendered
/// insight list.
pub const DEFAULT_ANSWER_PROMPT: &str = r#"You are a market research analyst preparing a briefing about a company.

Question: {query}

Collected insights (category | impact | confidence, then title, finding and source):
{insights}

Write a markdown answer to the question using ONLY the insights above. Cite sources inline as markdown links. Keep the answer under 200 words. If the insights do not contain enough information, say so plainly instead of guessing.

Then suggest at most 2 follow-up questions, each under 15 words, that would fill the biggest gaps in the research.

Respond with ONLY a JSON object of this shape, no preamble:
{"answer": "<markdown>", "follow_up_questions": ["<question>", "<question>"]}"#;

/// Render insights as prompt lines.
pub fn render_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "(no insights have been collected yet)".to_string();
    }

    insights
        .iter()
        .map(|i| {
            format!(
                "- [{} | {} | {:.2}] {}: {} (source: {})",
                i.category, i.impact, i.confidence, i.title, i.content, i.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill the placeholders of `template` in one pass; substituted text is
/// never scanned again.
pub(crate) fn render_prompt(template: &str, query_content: &str, insights: &[Insight]) -> String {
    let rendered = render_insights(insights);
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "query" => query_content.to_string(),
            _ => rendered.clone(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_types::{Impact, NewInsight};
    use uuid::Uuid;

    fn insight() -> Insight {
        Insight::from_new(
            Uuid::now_v7(),
            NewInsight {
                title: "Cloud leader".to_string(),
                category: "Market Position".to_string(),
                content: "AWS leads cloud infrastructure.".to_string(),
                source: "https://aws.amazon.com/".to_string(),
                impact: Impact::High,
                confidence: 0.9,
                entity: "Amazon".to_string(),
                created_at: None,
            },
        )
    }

    #[test]
    fn test_render_prompt_fills_both_placeholders() {
        let prompt = render_prompt("Q: {query}\nI: {insights}", "Who is Bezos", &[insight()]);
        assert!(prompt.starts_with("Q: Who is Bezos\nI: - [Market Position | "));
        assert!(prompt.contains("(source: https://aws.amazon.com/)"));
    }

    #[test]
    fn test_placeholder_text_in_query_is_left_alone() {
        let prompt = render_prompt("Q: {query}\nI: {insights}", "what is {insights}?", &[insight()]);
        assert!(prompt.starts_with("Q: what is {insights}?\nI: - ["));
        assert_eq!(prompt.matches("Cloud leader").count(), 1);
    }

    #[test]
    fn test_render_empty_insights() {
        let prompt = render_prompt("{insights}", "q", &[]);
        assert_eq!(prompt, "(no insights have been collected yet)");
    }
}
