// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Deepseek chat completions API.
//!
//! Deepseek exposes an OpenAI-compatible surface, so the wire types here
//! are the generic `chat/completions` request and response shapes. The
//! client handles authentication, per-request timeouts, and transient
//! error retry with exponential backoff and jitter.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue};
use ritmo_core::RitmoError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Client for the Deepseek chat completions endpoint.
///
/// Retries transient failures (429, 500, 502, 503, 504, timeouts) up to
/// `max_retries` times with backoff `300ms * 2^attempt` plus 0..200ms of
/// jitter.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ChatClient {
    /// Builds a client with the bearer key baked into default headers.
    ///
    /// `base_url` should include the version segment (e.g.
    /// `https://api.deepseek.com/v1`); a trailing slash is stripped.
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout_ms: u64,
        max_retries: u32,
    ) -> Result<Self, RitmoError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| RitmoError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| RitmoError::Evaluator {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sends a completion request and returns the first choice's content.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, RitmoError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error: Option<RitmoError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff(attempt - 1);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying chat request");
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(request).send().await {
                Ok(r) => r,
                Err(e) => {
                    // Network failures and timeouts retry like a 5xx.
                    warn!(error = %e, attempt, "chat request failed to send");
                    last_error = Some(RitmoError::Evaluator {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    });
                    continue;
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, "chat response received");

            if status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                // OpenAI-like envelope; if the outer layer is malformed we
                // hand the raw body to the tolerant model-JSON parser.
                let content = match serde_json::from_str::<ChatResponse>(&raw) {
                    Ok(parsed) => parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| c.message.content)
                        .unwrap_or_default(),
                    Err(_) => raw,
                };
                return Ok(content);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %truncate(&body, 200), "transient error, will retry");
                last_error = Some(RitmoError::Evaluator {
                    message: format!("API returned {status}"),
                    source: None,
                });
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(RitmoError::Evaluator {
                message: format!("API returned {status}: {}", truncate(&body, 200)),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| RitmoError::Evaluator {
            message: "chat request failed after retries".into(),
            source: None,
        }))
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

fn backoff(attempt: u32) -> Duration {
    let base = 300u64 * (1u64 << attempt.min(10));
    let jitter = rand::thread_rng().gen_range(0..200);
    Duration::from_millis(base + jitter)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ChatClient {
        ChatClient::new("test-key", "https://api.deepseek.com/v1", 5_000, 2)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> ChatRequest {
        ChatRequest {
            model: "deepseek-chat".into(),
            temperature: 0.0,
            max_tokens: 200,
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content: "hola".into(),
            }],
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "cmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn chat_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({"model": "deepseek-chat", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"score\":90}")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let content = client.chat(&test_request()).await.unwrap();
        assert_eq!(content, "{\"score\":90}");
    }

    #[tokio::test]
    async fn chat_retries_on_429_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let content = client.chat(&test_request()).await.unwrap();
        assert_eq!(content, "ok");
    }

    #[tokio::test]
    async fn chat_fails_fast_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("400"), "got: {err}");
    }

    #[tokio::test]
    async fn chat_exhausts_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.chat(&test_request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_envelope_falls_back_to_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[not an envelope]"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let content = client.chat(&test_request()).await.unwrap();
        assert_eq!(content, "[not an envelope]");
    }
}
