use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Returned to callers whenever the remote endpoint fails for any reason.
/// Callers must treat this as a valid (if degraded) reply.
pub const FALLBACK_REPLY: &str =
    "I apologize, but there was an error processing your request.";

const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.95;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// A completion reply. `degraded` is set when the text is the fallback
/// apology rather than a real model reply; the HTTP surface does not
/// expose it, but orchestrators and tests can.
#[derive(Debug, Clone)]
pub struct LlmReply {
    pub text: String,
    pub degraded: bool,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct LlmGateway {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send a single-turn completion request. Never fails: transport or API
    /// errors are logged and collapsed into the fallback apology reply.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> LlmReply {
        match self.try_complete(prompt, max_tokens).await {
            Ok(text) => LlmReply {
                text,
                degraded: false,
            },
            Err(e) => {
                warn!("error querying LLM endpoint: {e:#}");
                LlmReply {
                    text: FALLBACK_REPLY.to_string(),
                    degraded: true,
                }
            }
        }
    }

    async fn try_complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("chat completion returned {status}: {}", text.trim());
        }

        let parsed: ChatResponse = resp.json().await.context("chat completion parse")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("chat completion had no choices")?;
        Ok(content.trim().to_string())
    }
}
