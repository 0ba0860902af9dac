//! Answer synthesis from a query and its insights.
//!
//! The [`Synthesizer`] trait is the seam to whatever produces the narrative
//! answer. [`DigestSynthesizer`] works offline from the insights alone;
//! [`LlmSynthesizer`] hands the work to a configured language model.

mod config;
mod digest;
mod llm;
mod prompts;

use crate::{Result, ScoutError};
use async_trait::async_trait;
use scout_types::{Insight, SynthesizedAnswer};
use std::time::Duration;
use tracing::warn;

pub use config::{LlmConfig, LlmProvider};
pub use digest::DigestSynthesizer;
pub use llm::LlmSynthesizer;
pub use prompts::{render_insights, DEFAULT_ANSWER_PROMPT};

/// Produces an answer and follow-up questions from a query and its insights.
///
/// Implementations must be pure functions of their inputs, accept an empty
/// insight list, and return output already clamped with
/// [`SynthesizedAnswer::bounded`].
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn synthesize(&self, query_content: &str, insights: &[Insight]) -> Result<SynthesizedAnswer>;
}

/// Run `synthesizer` with an upper bound on how long it may take.
///
/// Expiry is reported as [`ScoutError::ServiceUnavailable`].
pub async fn synthesize_within(
    synthesizer: &dyn Synthesizer,
    timeout: Duration,
    query_content: &str,
    insights: &[Insight],
) -> Result<SynthesizedAnswer> {
    match tokio::time::timeout(timeout, synthesizer.synthesize(query_content, insights)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                target: "scout::synth",
                "{} synthesizer timed out after {:?}",
                synthesizer.name(),
                timeout
            );
            Err(ScoutError::ServiceUnavailable(format!(
                "answer generation timed out after {}s",
                timeout.as_secs_f64()
            )))
        }
    }
}

/// Build the synthesizer selected by `config`.
pub fn from_config(config: &LlmConfig) -> Result<Box<dyn Synthesizer>> {
    if config.enabled {
        Ok(Box::new(LlmSynthesizer::new(config.clone())?))
    } else {
        Ok(Box::new(DigestSynthesizer::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledSynthesizer;

    #[async_trait]
    impl Synthesizer for StalledSynthesizer {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn synthesize(&self, _query: &str, _insights: &[Insight]) -> Result<SynthesizedAnswer> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SynthesizedAnswer::bounded("late", Vec::new()))
        }
    }

    #[tokio::test]
    async fn test_timeout_is_service_unavailable() {
        let err = synthesize_within(&StalledSynthesizer, Duration::from_millis(20), "q", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_within_passes_result_through() {
        let answer = synthesize_within(&DigestSynthesizer::new(), Duration::from_secs(5), "q", &[])
            .await
            .unwrap();
        assert!(!answer.answer.is_empty());
    }

    #[test]
    fn test_from_config_disabled_uses_digest() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::base_default()
        };
        assert_eq!(from_config(&config).unwrap().name(), "digest");
    }
}
