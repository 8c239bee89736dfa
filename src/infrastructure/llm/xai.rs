//! x.ai chat completions client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::domain::{AnswerGenerator, DomainError};
use crate::infrastructure::http_client::{HttpClientTrait, HttpError};

const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Generator backed by the x.ai chat completions API.
#[derive(Debug)]
pub struct XaiGenerator<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl<C: HttpClientTrait> XaiGenerator<C> {
    pub fn new(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn map_http_error(error: HttpError) -> DomainError {
    match error {
        HttpError::Timeout { seconds } => DomainError::generation_timeout(seconds),
        other => DomainError::generation(other.to_string()),
    }
}

#[async_trait]
impl<C: HttpClientTrait> AnswerGenerator for XaiGenerator<C> {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, DomainError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Requesting completion");

        let response = self
            .client
            .post_json(
                &self.completions_url(),
                vec![
                    ("Authorization", self.auth_header.as_str()),
                    ("Content-Type", "application/json"),
                ],
                &body,
            )
            .await
            .map_err(map_http_error)?;

        let parsed: ChatCompletionResponse = serde_json::from_value(response)
            .map_err(|e| DomainError::generation(format!("unexpected response shape: {e}")))?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(DomainError::generation("model returned an empty completion"));
        }

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_completion() {
        let client = MockHttpClient::new().with_response(
            "https://api.x.ai/v1/chat/completions",
            completion_body("  Craft it with 2 diamonds and 1 stick.  "),
        );
        let generator = XaiGenerator::new(client, "key", "https://api.x.ai/v1", "grok-4-fast");

        let answer = generator.generate("How do I craft a sword?", 0.3).await.unwrap();
        assert_eq!(answer, "Craft it with 2 diamonds and 1 stick.");
    }

    #[tokio::test]
    async fn test_generate_sends_model_and_temperature() {
        let client = MockHttpClient::new().with_response(
            "https://api.x.ai/v1/chat/completions",
            completion_body("ok"),
        );
        let generator =
            XaiGenerator::new(client, "key", "https://api.x.ai/v1/", "grok-4-fast").with_max_tokens(500);

        generator.generate("prompt text", 0.7).await.unwrap();

        let requests = generator.client.requests();
        assert_eq!(requests.len(), 1);
        let (url, body) = &requests[0];
        assert_eq!(url, "https://api.x.ai/v1/chat/completions");
        assert_eq!(body["model"], "grok-4-fast");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["content"], "prompt text");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_generate_maps_timeout() {
        let client = MockHttpClient::new().with_error(
            "https://api.x.ai/v1/chat/completions",
            HttpError::Timeout { seconds: 60 },
        );
        let generator = XaiGenerator::new(client, "key", "https://api.x.ai/v1", "grok-4-fast");

        let err = generator.generate("prompt", 0.3).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_generate_maps_status_error() {
        let client = MockHttpClient::new().with_error(
            "https://api.x.ai/v1/chat/completions",
            HttpError::Status {
                status: 429,
                body: "rate limited".to_string(),
            },
        );
        let generator = XaiGenerator::new(client, "key", "https://api.x.ai/v1", "grok-4-fast");

        let err = generator.generate("prompt", 0.3).await.unwrap_err();
        assert!(matches!(err, DomainError::Generation { .. }));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let client = MockHttpClient::new().with_response(
            "https://api.x.ai/v1/chat/completions",
            completion_body("   "),
        );
        let generator = XaiGenerator::new(client, "key", "https://api.x.ai/v1", "grok-4-fast");

        let err = generator.generate("prompt", 0.3).await.unwrap_err();
        assert!(matches!(err, DomainError::Generation { .. }));
    }
}
