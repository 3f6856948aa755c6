// src/analysis/llm.rs
//! Optional language-model stage. Works against any OpenAI-compatible
//! chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::utils::error::LlmError;

/// System message sent with every analysis request.
pub const ANALYST_PERSONA: &str = "You are a senior financial analyst. \
Base your analysis only on the balance sheet data and 10-K section supplied in the user message. \
Do not try to retrieve or request any further data.";

/// Chat model that answers a single system + user exchange.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Result of the analysis stage; failures are kept as text for the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed(String),
    Failed(String),
}

impl AnalysisOutcome {
    /// Body appended under the analysis separator.
    pub fn as_block(&self) -> String {
        match self {
            AnalysisOutcome::Completed(text) => text.clone(),
            AnalysisOutcome::Failed(reason) => format!("Analysis failed: {}", reason),
        }
    }
}

/// Sends `prompt` to the model with the analyst persona.
///
/// Errors and timeouts are folded into `AnalysisOutcome::Failed`.
pub async fn analyze(model: &dyn LanguageModel, prompt: &str, timeout: Duration) -> AnalysisOutcome {
    tracing::info!("Requesting LLM analysis ({} chars of prompt)", prompt.len());

    match tokio::time::timeout(timeout, model.complete(ANALYST_PERSONA, prompt)).await {
        Ok(Ok(text)) => {
            tracing::info!("LLM analysis received ({} chars)", text.len());
            AnalysisOutcome::Completed(text)
        }
        Ok(Err(e)) => {
            tracing::warn!("LLM analysis failed: {}", e);
            AnalysisOutcome::Failed(e.to_string())
        }
        Err(_) => {
            let e = LlmError::Timeout(timeout.as_secs());
            tracing::warn!("LLM analysis failed: {}", e);
            AnalysisOutcome::Failed(e.to_string())
        }
    }
}

/// Client for `POST {api_base}/chat/completions`.
pub struct OpenAiChat {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiChat {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn reply_text(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::UnexpectedResponse("response has no message content".to_string()))
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        tracing::debug!("Sending chat completion to {} (model {})", url, self.config.model);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let response = self.client.post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimitExceeded(body),
                _ => LlmError::RequestFailed(format!("HTTP {}: {}", status, body)),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            LlmError::UnexpectedResponse(format!("Failed to parse response: {}", e.without_url()))
        })?;
        reply_text(parsed)
    }
}
