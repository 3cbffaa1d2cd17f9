//! Text-generation service client.
//!
//! The orchestrator only sees the [`TextGenerator`] seam: submit a prompt
//! with an output-size bound, get text back or a typed failure. The retry
//! loop needs to distinguish a rate limit (recoverable, backoff and retry)
//! from everything else (the field is abandoned), so the error is an enum
//! rather than an opaque `anyhow::Error`.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a Shopify store owner and you need help with your \
     product descriptions and SEO. You are working with columns in a product list, and should \
     only provide the value for the column and no surrounding text.";

/// Failure modes of a single generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service refused the call because of rate limiting. Recoverable:
    /// retry the identical call after a backoff wait.
    #[error("generation service rate limit exceeded")]
    RateLimited,
    /// Any other failure. The caller proceeds without the field.
    #[error("generation request failed: {0}")]
    Failed(#[source] anyhow::Error),
}

/// A capability that turns a prompt into generated text.
///
/// `&mut self` because implementations may carry connection or bookkeeping
/// state; the pipeline is strictly sequential so there is never aliasing.
pub trait TextGenerator {
    fn generate(&mut self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError>;
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    system_prompt: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl OpenAiGenerator {
    /// Build a client from `OPENAI_API_KEY`, with the endpoint and model
    /// overridable through `SHOPPREP_OPENAI_URL` / `SHOPPREP_MODEL`.
    pub fn from_env(temperature: f32) -> anyhow::Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY is required for enrichment")?;
        let endpoint =
            env::var("SHOPPREP_OPENAI_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model = env::var("SHOPPREP_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(60)))
            .build()
            .into();
        Ok(Self {
            agent,
            endpoint,
            api_key,
            model,
            temperature,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&mut self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&body);

        let mut response = match response {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(429)) => return Err(GenerationError::RateLimited),
            Err(err) => {
                return Err(GenerationError::Failed(
                    anyhow::Error::from(err).context("call generation endpoint"),
                ))
            }
        };

        let parsed: ChatResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| {
                GenerationError::Failed(
                    anyhow::Error::from(err).context("parse generation response"),
                )
            })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Failed(anyhow!("response carried no choices")))?;
        Ok(text.trim().to_string())
    }
}
