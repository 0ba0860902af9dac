//! Synthesized answers.

use crate::{Insight, Query};
use serde::{Deserialize, Serialize};

/// Upper bound on answer length, in words.
pub const MAX_ANSWER_WORDS: usize = 200;
/// Upper bound on the number of follow-up questions.
pub const MAX_FOLLOW_UPS: usize = 2;
/// Upper bound on a single follow-up question, in words.
pub const MAX_QUESTION_WORDS: usize = 15;

/// A narrative answer derived from a query and its insights.
///
/// Never persisted; regenerated on each request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedAnswer {
    /// Markdown text.
    pub answer: String,
    pub follow_up_questions: Vec<String>,
}

impl SynthesizedAnswer {
    /// Build an answer, clamping it to the word and question limits.
    pub fn bounded(answer: &str, questions: impl IntoIterator<Item = String>) -> Self {
        let follow_up_questions = questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(MAX_FOLLOW_UPS)
            .map(|q| {
                let mut q = truncate_words(&q, MAX_QUESTION_WORDS);
                if !q.ends_with('?') {
                    q.push('?');
                }
                q
            })
            .collect();

        Self {
            answer: truncate_words(answer, MAX_ANSWER_WORDS),
            follow_up_questions,
        }
    }
}

/// Full payload of the answer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: Query,
    pub insights: Vec<Insight>,
    pub answer: String,
    pub follow_up_questions: Vec<String>,
}

impl QueryAnswer {
    pub fn new(query: Query, insights: Vec<Insight>, synthesized: SynthesizedAnswer) -> Self {
        Self {
            query,
            insights,
            answer: synthesized.answer,
            follow_up_questions: synthesized.follow_up_questions,
        }
    }
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max` words of `text`, preserving its line structure.
pub fn truncate_words(text: &str, max: usize) -> String {
    let mut words = 0;
    let mut in_word = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > max {
                return format!("{}…", text[..idx].trim_end());
            }
        }
    }
    text.trim().to_string()
}
