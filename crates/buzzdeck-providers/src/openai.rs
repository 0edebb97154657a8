//! OpenAI-compatible API provider implementation.
//!
//! Works against any endpoint speaking the `/v1/chat/completions`
//! protocol (OpenAI, Groq, and the rest of the compatible gateways).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buzzdeck_core::model::QaPair;
use buzzdeck_core::parser::extract_question_pairs;
use buzzdeck_core::traits::{GenerateRequest, QuestionGenerator, SimilarityJudge};

use crate::error::ProviderError;
use crate::prompt::{generation_prompt, judge_prompt, JUDGE_TEMPERATURE};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible API provider. One instance serves both generation
/// and answer judging; the judge uses the configured default model.
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, base_url: Option<String>, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.to_string(),
            client,
        }
    }

    async fn chat(&self, model: &str, temperature: f64, content: String) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: model.to_string(),
            temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(model.to_string()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl QuestionGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
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
impl SimilarityJudge for OpenAiProvider {
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
