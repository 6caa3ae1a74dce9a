//! # classifier::llm — LLM-backed classifier
//!
//! One HTTP request per article to the configured provider, reply parsed by
//! [`parse_judgment`].  Timeouts, retries and the concurrency cap belong to
//! the dispatcher; this client only maps HTTP outcomes onto
//! [`ClassifyError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::parse::parse_judgment;
use crate::classifier::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::classifier::Classifier;
use crate::config::Provider;
use crate::error::ClassifyError;
use crate::models::{Article, Judgment};

const WAVESPEED_URL: &str = "https://api.wavespeed.ai/api/v3/wavespeed-ai/any-llm";
const CLAUDE_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct LlmClassifier {
    client:   reqwest::Client,
    provider: Provider,
    api_key:  String,
    model:    String,
}

impl LlmClassifier {
    pub fn new(
        client: reqwest::Client,
        provider: Provider,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            provider,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        match self.provider {
            Provider::WaveSpeed => self.call_wavespeed(prompt).await,
            Provider::Claude => self.call_claude(prompt).await,
            Provider::OpenAi => self.call_openai(prompt).await,
        }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, ticker: &str, article: &Article) -> Result<Judgment, ClassifyError> {
        let prompt = build_prompt(ticker, article);
        let reply = self.complete(&prompt).await?;
        debug!(article_id = %article.id, chars = reply.len(), "LLM reply received");
        parse_judgment(&reply)
    }
}

// ─── HTTP plumbing ────────────────────────────────────────────────────────────

fn transport(err: reqwest::Error) -> ClassifyError {
    ClassifyError::Transport(err.without_url().to_string())
}

/// Map a non-2xx status onto the failure taxonomy.
fn status_error(provider: Provider, status: StatusCode, body: &str) -> ClassifyError {
    let body = body.chars().take(300).collect::<String>();
    if status == StatusCode::TOO_MANY_REQUESTS {
        ClassifyError::RateLimited(format!("{provider} HTTP {status}: {body}"))
    } else {
        ClassifyError::Transport(format!("{provider} HTTP {status}: {body}"))
    }
}

async fn read_json<T: for<'de> Deserialize<'de>>(
    provider: Provider,
    resp: reqwest::Response,
) -> Result<T, ClassifyError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(provider, status, &body));
    }

    let body = resp.text().await.map_err(transport)?;
    serde_json::from_str(&body)
        .map_err(|e| ClassifyError::MalformedResponse(format!("{provider} envelope: {e}")))
}

// ─── WaveSpeed any-llm ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WaveSpeedRequest<'a> {
    enable_sync_mode: bool,
    model:            &'a str,
    priority:         &'a str,
    prompt:           &'a str,
    reasoning:        bool,
}

#[derive(Deserialize)]
struct WaveSpeedResponse {
    code:    Option<u16>,
    message: Option<String>,
    data:    Option<WaveSpeedData>,
}

#[derive(Deserialize)]
struct WaveSpeedData {
    #[serde(default)]
    outputs: Vec<String>,
}

impl WaveSpeedResponse {
    fn into_text(self) -> Result<String, ClassifyError> {
        match self.code {
            Some(429) => {
                return Err(ClassifyError::RateLimited(
                    self.message.unwrap_or_else(|| "WaveSpeed rate limit".to_string()),
                ))
            }
            Some(200) | None => {}
            Some(code) => {
                return Err(ClassifyError::Transport(format!(
                    "WaveSpeed code {code}: {}",
                    self.message.unwrap_or_default()
                )))
            }
        }

        self.data
            .and_then(|d| d.outputs.into_iter().next())
            .ok_or_else(|| ClassifyError::MalformedResponse("WaveSpeed returned no outputs".into()))
    }
}

impl LlmClassifier {
    async fn call_wavespeed(&self, prompt: &str) -> Result<String, ClassifyError> {
        let body = WaveSpeedRequest {
            enable_sync_mode: true,
            model:            &self.model,
            priority:         "latency",
            prompt,
            reasoning:        false,
        };

        let resp = self
            .client
            .post(WAVESPEED_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        read_json::<WaveSpeedResponse>(self.provider, resp).await?.into_text()
    }
}

// ─── Anthropic Claude ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model:      &'a str,
    max_tokens: u32,
    system:     &'a str,
    messages:   Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: Option<String>,
}

impl LlmClassifier {
    async fn call_claude(&self, prompt: &str) -> Result<String, ClassifyError> {
        let body = ClaudeRequest {
            model:      &self.model,
            max_tokens: 256,
            system:     SYSTEM_PROMPT,
            messages:   vec![ChatMessage { role: "user", content: prompt }],
        };

        let resp = self
            .client
            .post(CLAUDE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let data: ClaudeResponse = read_json(self.provider, resp).await?;
        data.content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| ClassifyError::MalformedResponse("Claude returned empty content".into()))
    }
}

// ─── OpenAI ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model:    &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMsg,
}

#[derive(Deserialize)]
struct OpenAiChoiceMsg {
    content: Option<String>,
}

impl LlmClassifier {
    async fn call_openai(&self, prompt: &str) -> Result<String, ClassifyError> {
        let body = OpenAiRequest {
            model:    &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user",   content: prompt },
            ],
        };

        let resp = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let data: OpenAiResponse = read_json(self.provider, resp).await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassifyError::MalformedResponse("OpenAI returned empty content".into()))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_429_is_rate_limited() {
        let err = status_error(Provider::OpenAi, StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, ClassifyError::RateLimited(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_other_statuses_are_transport() {
        let err = status_error(Provider::Claude, StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ClassifyError::Transport(_)));
    }

    #[test]
    fn test_wavespeed_envelope_success() {
        let resp: WaveSpeedResponse = serde_json::from_str(
            r#"{"code":200,"message":"success","data":{"outputs":["{\"sentiment\":\"bullish\"}"]}}"#,
        )
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), r#"{"sentiment":"bullish"}"#);
    }

    #[test]
    fn test_wavespeed_envelope_errors() {
        let resp: WaveSpeedResponse =
            serde_json::from_str(r#"{"code":429,"message":"too many requests"}"#).unwrap();
        assert!(matches!(resp.into_text(), Err(ClassifyError::RateLimited(_))));

        let resp: WaveSpeedResponse =
            serde_json::from_str(r#"{"code":200,"data":{"outputs":[]}}"#).unwrap();
        assert!(matches!(resp.into_text(), Err(ClassifyError::MalformedResponse(_))));

        let resp: WaveSpeedResponse =
            serde_json::from_str(r#"{"code":500,"message":"model offline"}"#).unwrap();
        assert!(matches!(resp.into_text(), Err(ClassifyError::Transport(_))));
    }
}
