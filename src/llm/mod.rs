//! Chat-completions client for OpenAI-compatible APIs.

use crate::utils::error::{Result, Story2TestError};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a QA engineer who outputs JSON only.";

const PROMPT_TEMPLATE: &str = r#"
I will provide acceptance criteria. Produce JSON:
{
 "positive": [...],
 "negative": [...]
}
Each test has: id, title, preconditions, steps, expected_result, priority.
Generate 3-6 positive and 3-6 negative tests. JSON only.

Acceptance Criteria:
{ac}
"#;

/// Fills the acceptance criteria into the generation prompt.
pub fn build_prompt(acceptance_criteria: &str) -> String {
    PROMPT_TEMPLATE.replace("{ac}", acceptance_criteria)
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

pub struct LlmClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_base: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Single non-streaming chat completion. Returns the assistant message
    /// content of the first choice.
    pub async fn chat_completion(
        &self,
        model: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let body = json!({
            "model": model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt},
            ],
        });

        tracing::debug!("Sending chat completion request to: {}", url);
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Story2TestError::ApiStatusError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let response: ChatCompletionResponse = resp.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Story2TestError::ProcessingError {
                message: "API response contained no completion content".to_string(),
            })
    }
}

/// Parses model output as JSON, falling back to the outermost `{...}` block
/// when the model wraps the payload in prose or code fences.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let braces = Regex::new(r"(?s)(\{.*\})").expect("valid regex");
    if let Some(captures) = braces.captures(text) {
        if let Ok(value) = serde_json::from_str(captures.get(1)?.as_str()) {
            return Some(value);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_build_prompt_substitutes_criteria() {
        let prompt = build_prompt("User can log in with email and password.");
        assert!(prompt.contains("Acceptance Criteria:\nUser can log in with email and password."));
        assert!(prompt.contains("\"positive\": [...]"));
        assert!(!prompt.contains("{ac}"));
    }

    #[test]
    fn test_extract_json_direct() {
        let value = extract_json(r#"{"positive": [], "negative": []}"#).unwrap();
        assert!(value.get("positive").is_some());
    }

    #[test]
    fn test_extract_json_from_prose() {
        let text = "Here are your tests:\n```json\n{\"positive\": [{\"id\": \"TC-1\"}]}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["positive"][0]["id"], "TC-1");
    }

    #[test]
    fn test_extract_json_garbage_returns_none() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("{broken").is_none());
    }

    #[tokio::test]
    async fn test_chat_completion_sends_auth_and_parses_content() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("Authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "gpt-4o-mini", "max_tokens": 1000}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"positive\": []}"}}]
                }));
        });

        let client = LlmClient::new(&server.base_url(), "test-key", 30).unwrap();
        let content = client
            .chat_completion(DEFAULT_MODEL, "prompt", 1000, 0.0)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(content, "{\"positive\": []}");
    }

    #[tokio::test]
    async fn test_chat_completion_surfaces_api_error_body() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("invalid api key");
        });

        let client = LlmClient::new(&server.base_url(), "bad-key", 30).unwrap();
        let err = client
            .chat_completion(DEFAULT_MODEL, "prompt", 1000, 0.0)
            .await
            .unwrap_err();

        match err {
            Story2TestError::ApiStatusError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_completion_empty_choices_is_processing_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let client = LlmClient::new(&server.base_url(), "test-key", 30).unwrap();
        let err = client
            .chat_completion(DEFAULT_MODEL, "prompt", 1000, 0.0)
            .await
            .unwrap_err();

        assert!(matches!(err, Story2TestError::ProcessingError { .. }));
    }
}
