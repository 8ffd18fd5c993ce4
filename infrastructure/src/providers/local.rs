//! Adapter for locally hosted single-prompt servers
//!
//! These servers expose an `inquire` endpoint taking one prompt and
//! returning plain text. Multi-turn histories are marshalled into a
//! `PATIENT:`/`DOCTOR:` script before being sent as a single prompt.

use super::{http_client, status_error, transport_error};
use async_trait::async_trait;
use clinicsim_application::{ClientError, LlmClient};
use clinicsim_domain::{Message, Model, Role, marshal_transcript};
use serde_json::json;

/// Client for a locally hosted generation server
pub struct LocalClient {
    model: Model,
    http: reqwest::Client,
}

impl LocalClient {
    /// `model` carries the server's base URL as its identity.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            http: http_client(),
        }
    }

    async fn post_prompt(&self, role: Role, body: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/inquire", self.model.as_str()))
            .json(&json!({"role": role.as_wire_str(), "content": body}))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        response
            .text()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmClient for LocalClient {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn inquire(&self, prompt: &Message) -> Result<Message, ClientError> {
        let body = self.post_prompt(prompt.role, &prompt.body).await?;
        Ok(Message::derived(prompt, Role::Assistant, body))
    }

    async fn converse(&self, history: &[Message]) -> Result<Message, ClientError> {
        let template = history
            .last()
            .ok_or_else(|| ClientError::MalformedResponse("empty history".to_string()))?;
        let script = marshal_transcript(history);
        let body = self.post_prompt(Role::User, &script).await?;
        Ok(Message::derived(template, Role::Assistant, body))
    }
}
