//! Ollama (local LLM) provider implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buzzdeck_core::model::QaPair;
use buzzdeck_core::parser::extract_question_pairs;
use buzzdeck_core::traits::{GenerateRequest, QuestionGenerator, SimilarityJudge};

use crate::error::ProviderError;
use crate::prompt::{generation_prompt, judge_prompt, JUDGE_TEMPERATURE};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300; // Local models are slower

/// Ollama local LLM provider.
pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.to_string(),
            model: model.to_string(),
            client,
        }
    }

    async fn chat(&self, model: &str, temperature: f64, content: String) -> anyhow::Result<String> {
        let body = OllamaRequest {
            model: model.to_string(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content,
            }],
            stream: false,
            options: Some(OllamaOptions { temperature }),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else if e.is_connect() {
                    ProviderError::NetworkError(format!(
                        "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                        self.base_url
                    ))
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(ProviderError::ModelNotFound(format!(
                "Model '{model}' not found locally. Pull it with: ollama pull {model}"
            ))
            .into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: OllamaResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(api_response.message.content)
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl QuestionGenerator for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model, source_type = %request.source_type))]
    async fn generate_questions(&self, request: &GenerateRequest) -> anyhow::Result<Vec<QaPair>> {
        let content = self
            .chat(
                &request.model,
                request.temperature,
                generation_prompt(request),
            )
            .await?;
        Ok(extract_question_pairs(&content))
    }
}

#[async_trait]
impl SimilarityJudge for OllamaProvider {
    #[instrument(skip(self, user_answer, correct_answer))]
    async fn judge(&self, user_answer: &str, correct_answer: &str) -> anyhow::Result<bool> {
        let verdict = self
            .chat(
                &self.model,
                JUDGE_TEMPERATURE,
                judge_prompt(user_answer, correct_answer),
            )
            .await?;
        Ok(verdict.trim().to_lowercase() == "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzdeck_core::traits::SourceType;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generate_request() -> GenerateRequest {
        GenerateRequest {
            source: "the French Revolution".into(),
            source_type: SourceType::Topic,
            model: "llama3.1:8b".into(),
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "message": {"role": "assistant", "content": "[{\"question\": \"In what year did the French Revolution begin?\", \"answer\": \"1789\"}]"},
            "model": "llama3.1:8b"
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri(), "llama3.1:8b");
        let pairs = provider.generate_questions(&generate_request()).await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "1789");
    }

    #[tokio::test]
    async fn judge_parses_verdict() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "message": {"role": "assistant", "content": "true"},
            "model": "llama3.1:8b"
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri(), "llama3.1:8b");
        assert!(provider.judge("1789", "1789").await.unwrap());
    }

    #[tokio::test]
    async fn model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri(), "nonexistent");
        let err = provider.generate_questions(&generate_request()).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("ollama pull"));
    }
}
