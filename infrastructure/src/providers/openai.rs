//! OpenAI-compatible chat-completions adapter
//!
//! Serves every identity whose service speaks the OpenAI chat API, which
//! includes Mistral and DeepSeek behind their own base URLs.

use super::{http_client, status_error, transport_error};
use async_trait::async_trait;
use clinicsim_application::{ClientError, LlmClient};
use clinicsim_domain::{Message, Model, Role};
use serde::Deserialize;
use serde_json::json;

/// Sampling temperature used for every benchmark completion.
const TEMPERATURE: f64 = 0.6;

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

/// Client for OpenAI-compatible chat-completion services
pub struct OpenAiCompatClient {
    model: Model,
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatClient {
    pub fn new(model: Model, base_url: String, api_key: String) -> Self {
        Self {
            model,
            http: http_client(),
            base_url,
            api_key,
        }
    }

    async fn complete(&self, history: &[Message]) -> Result<String, ClientError> {
        let messages: Vec<_> = history
            .iter()
            .map(|m| json!({"role": m.role.as_wire_str(), "content": m.body}))
            .collect();

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model.as_str(),
                "messages": messages,
                "temperature": TEMPERATURE,
            }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::MalformedResponse("empty choices".to_string()))
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn inquire(&self, prompt: &Message) -> Result<Message, ClientError> {
        let body = self.complete(std::slice::from_ref(prompt)).await?;
        Ok(Message::derived(prompt, Role::Assistant, body))
    }

    async fn converse(&self, history: &[Message]) -> Result<Message, ClientError> {
        let template = history
            .last()
            .ok_or_else(|| ClientError::MalformedResponse("empty history".to_string()))?;
        let body = self.complete(history).await?;
        Ok(Message::derived(template, Role::Assistant, body))
    }
}
