//! Answer synthesis through a language model provider.

use super::config::{LlmConfig, LlmProvider};
use super::prompts::render_prompt;
use super::Synthesizer;
use crate::{Result, ScoutError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scout_types::{Insight, SynthesizedAnswer};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Transport-level ceiling; the caller's synthesis timeout is usually tighter.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid JSON object regex"));

/// Adapter that asks a configured model for the answer.
pub struct LlmSynthesizer {
    config: LlmConfig,
    client: Client,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// OpenAI-compatible chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// Shape the prompt asks the model to answer in.
#[derive(Debug, Deserialize)]
struct ModelAnswer {
    answer: String,
    #[serde(default)]
    follow_up_questions: Vec<String>,
}

impl LlmSynthesizer {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ScoutError::ServiceUnavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.config.provider {
            LlmProvider::Ollama => self.call_ollama(prompt).await,
            LlmProvider::OpenAI => self.call_openai(prompt).await,
        }
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            format: "json",
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint());
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;
        let resp = check_status(resp).await?;

        let body: OllamaResponse = resp.json().await.map_err(unavailable)?;
        Ok(body.response)
    }

    async fn call_openai(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint());
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = builder.send().await.map_err(unavailable)?;
        let resp = check_status(resp).await?;

        let body: ChatResponse = resp.json().await.map_err(unavailable)?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ScoutError::ServiceUnavailable("model returned no choices".to_string()))
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn synthesize(&self, query_content: &str, insights: &[Insight]) -> Result<SynthesizedAnswer> {
        let prompt = render_prompt(self.config.answer_prompt(), query_content, insights);
        debug!(
            target: "scout::synth",
            "Requesting answer from {:?} model {} ({} insights)",
            self.config.provider,
            self.config.model,
            insights.len()
        );

        let reply = self.complete(&prompt).await?;
        let answer = parse_reply(&reply)?;
        info!(
            target: "scout::synth",
            "Model answered with {} follow-up questions",
            answer.follow_up_questions.len()
        );
        Ok(answer)
    }
}

fn unavailable(err: reqwest::Error) -> ScoutError {
    ScoutError::ServiceUnavailable(err.to_string())
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ScoutError::ServiceUnavailable(format!("HTTP {}: {}", status, body)))
}

/// Turn the model's reply into a bounded answer.
///
/// Accepts bare or fenced JSON; a reply that is not JSON at all is used
/// verbatim as the answer.
fn parse_reply(reply: &str) -> Result<SynthesizedAnswer> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ScoutError::ServiceUnavailable("model returned an empty answer".to_string()));
    }

    let parsed = JSON_OBJECT
        .find(reply)
        .and_then(|m| serde_json::from_str::<ModelAnswer>(m.as_str()).ok());

    match parsed {
        Some(model) if !model.answer.trim().is_empty() => Ok(SynthesizedAnswer::bounded(
            &model.answer,
            model.follow_up_questions,
        )),
        Some(_) => Err(ScoutError::ServiceUnavailable("model returned an empty answer".to_string())),
        None => Ok(SynthesizedAnswer::bounded(reply, Vec::new())),
    }
}
