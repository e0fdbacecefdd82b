use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::InferenceError;
use crate::config::EngineConfig;

/// Sampling temperature sent with every extraction request.
const TEMPERATURE: f32 = 0.1;
/// Upper bound on the reply length; the JSON object is short.
const MAX_TOKENS: u32 = 200;

/// Chat-completion client abstraction (allows mocking)
pub trait LlmClient: Send + Sync {
    /// Send one user prompt and return the assistant's reply text.
    fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// Blocking client for an OpenAI-style `/v1/chat/completions` endpoint.
pub struct ChatCompletionClient {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ChatCompletionClient {
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self, InferenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            model: model.trim().to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, InferenceError> {
        Self::new(&config.endpoint, &config.model, config.timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for `/v1/chat/completions`
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from `/v1/chat/completions`
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl LlmClient for ChatCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    InferenceError::Connection(self.endpoint.clone())
                } else {
                    InferenceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::EndpointError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| InferenceError::MalformedResponse("No choices[0].message.content".into()))
    }
}

/// Mock client for testing: returns a configured reply or error.
pub struct MockLlmClient {
    reply: Result<String, InferenceError>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
        }
    }

    pub fn failing(error: InferenceError) -> Self {
        Self { reply: Err(error) }
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.reply.clone()
    }
}
