//! LLM API client
//!
//! Blocking client for an OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::prompt::{build_prompt, default_response_template, SYSTEM_PROMPT};
use super::{AiError, AiResult, ProductAssistant};
use crate::config::Settings;
use crate::models::{AiServiceInput, AiServiceOutput, Score};

/// Client for GPT-style models behind an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct GptClient {
    api_key: String,
    model: String,
    base_url: String,
    response_template: Value,
    http: Client,
}

impl GptClient {
    /// Create a client; fails if the API key is empty
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> AiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            response_template: default_response_template(),
            http,
        })
    }

    /// Create a client from application settings
    pub fn from_settings(settings: &Settings) -> AiResult<Self> {
        Self::new(
            settings.api_key.clone(),
            settings.model.clone(),
            settings.base_url.clone(),
            settings.ai_timeout,
        )
    }

    /// Use a custom JSON template to guide the model's responses
    pub fn with_response_template(mut self, template: Value) -> Self {
        self.response_template = template;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn response_template(&self) -> &Value {
        &self.response_template
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn complete(&self, prompt: String) -> AiResult<String> {
        let body = ChatRequest {
            model: &self.model,
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
            response_format: json!({"type": "json_object"}),
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json()?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

impl ProductAssistant for GptClient {
    fn analyze_product(&self, input: &AiServiceInput) -> AiResult<AiServiceOutput> {
        let prompt = build_prompt(input, &self.response_template);
        tracing::debug!("Sending analysis request to model {}", self.model);

        let content = self.complete(prompt).map_err(|e| {
            tracing::error!("Error in GPT analysis: {}", e);
            e
        })?;

        parse_analysis(&content)
    }
}

/// Parse the model's JSON answer into an analysis
///
/// Allergen and diet judgments must be well formed. The `score` block is
/// optional: a missing, null or unreadable score leaves `score` as `None`.
pub fn parse_analysis(content: &str) -> AiResult<AiServiceOutput> {
    let mut raw: Value =
        serde_json::from_str(content).map_err(|e| AiError::Parse(e.to_string()))?;
    let raw_score = raw.as_object_mut().and_then(|map| map.remove("score"));

    let mut output: AiServiceOutput =
        serde_json::from_value(raw).map_err(|e| AiError::Parse(e.to_string()))?;

    output.score = match raw_score {
        None | Some(Value::Null) => None,
        Some(raw_score) => match Score::from_json(&raw_score, None) {
            Ok(score) => Some(score),
            Err(e) => {
                tracing::warn!("Ignoring unusable score in model response: {}", e);
                None
            }
        },
    };

    Ok(output)
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: Value,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
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
    content: Option<String>,
}
