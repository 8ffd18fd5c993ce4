//! Anthropic messages API adapter

use super::{http_client, status_error, transport_error};
use async_trait::async_trait;
use clinicsim_application::{ClientError, LlmClient};
use clinicsim_domain::{Message, Model, Role};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const API_VERSION: &str = "2023-06-01";

/// Reply length cap; dialogue turns are short by prompt design.
const MAX_TOKENS: u32 = 600;

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Client for the Anthropic messages API
pub struct AnthropicClient {
    model: Model,
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(model: Model, base_url: String, api_key: String) -> Self {
        Self {
            model,
            http: http_client(),
            base_url,
            api_key,
        }
    }

    async fn complete(&self, history: &[Message]) -> Result<String, ClientError> {
        // Anthropic takes the system prompt in a separate field.
        let (system, turns) = match history.split_first() {
            Some((first, rest)) if first.role == Role::System && !rest.is_empty() => {
                (Some(first.body.as_str()), rest)
            }
            _ => (None, history),
        };

        let messages: Vec<_> = turns
            .iter()
            .map(|m| json!({"role": m.role.as_wire_str(), "content": m.body}))
            .collect();
        let mut payload = json!({
            "model": self.model.as_str(),
            "max_tokens": MAX_TOKENS,
            "messages": messages,
        });
        if let Some(system) = system {
            payload["system"] = json!(system);
        }

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            warn!("Max tokens reached on {}", self.model);
        }
        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| ClientError::MalformedResponse("empty content".to_string()))
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
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
