use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use assess_core::model::{AssessmentTopic, DifficultyLevel, Question};

use super::{QuestionGenerator, build_prompt, parse_questions};
use crate::error::GenerationError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const SYSTEM_PROMPT: &str =
    "You write multiple-choice assessment questions and reply with JSON only.";

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl GeneratorConfig {
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let base_url = base_url.into().trim().to_string();
        if Url::parse(&base_url).is_err() {
            return Err(GenerationError::InvalidBaseUrl(base_url));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.4,
        })
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Read `ASSESS_AI_API_KEY`, `ASSESS_AI_BASE_URL` and `ASSESS_AI_MODEL`.
    ///
    /// Returns `Ok(None)` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidBaseUrl` if the configured base URL does not parse.
    pub fn from_env() -> Result<Option<Self>, GenerationError> {
        let Some(api_key) = env::var("ASSESS_AI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
        else {
            return Ok(None);
        };
        let base_url = env::var("ASSESS_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("ASSESS_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(base_url, api_key, model).map(Some)
    }
}

/// Question generator backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatQuestionGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl ChatQuestionGenerator {
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidBaseUrl` if the environment holds a bad base URL.
    pub fn from_env() -> Result<Self, GenerationError> {
        Ok(Self::new(GeneratorConfig::from_env()?))
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn complete(&self, prompt: String) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl QuestionGenerator for ChatQuestionGenerator {
    async fn generate_questions(
        &self,
        topic: &AssessmentTopic,
        mix: &[DifficultyLevel],
    ) -> Result<Vec<Question>, GenerationError> {
        let content = self.complete(build_prompt(topic, mix)).await?;
        parse_questions(&content, mix)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
