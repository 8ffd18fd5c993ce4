//! Generation service adapters
//!
//! One adapter per wire protocol: OpenAI-compatible chat completions (which
//! also serves Mistral and DeepSeek), the Anthropic messages API, and
//! single-prompt local servers. The adapter is chosen once from the
//! validated [`Model`] identity.

mod anthropic;
mod local;
mod openai;

pub use anthropic::AnthropicClient;
pub use local::LocalClient;
pub use openai::OpenAiCompatClient;

use crate::config::FileProvidersConfig;
use clinicsim_application::{ClientError, LlmClient};
use clinicsim_domain::{Model, Provider};
use std::sync::Arc;
use std::time::Duration;

/// Per-request transport timeout, after which the call fails rather than
/// blocking its worker slot forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(40);

/// Construct the client matching a validated model identity.
pub fn build_client(model: &Model, config: &FileProvidersConfig) -> Arc<dyn LlmClient> {
    match model.provider() {
        Provider::OpenAi => Arc::new(OpenAiCompatClient::new(
            model.clone(),
            config.openai.resolved_base_url("https://api.openai.com/v1"),
            config.openai.resolved_key("OPENAI_API_KEY"),
        )),
        Provider::Mistral => Arc::new(OpenAiCompatClient::new(
            model.clone(),
            config.mistral.resolved_base_url("https://api.mistral.ai/v1"),
            config.mistral.resolved_key("MISTRAL_API_KEY"),
        )),
        Provider::DeepSeek => Arc::new(OpenAiCompatClient::new(
            model.clone(),
            config.deepseek.resolved_base_url("https://api.deepseek.com/v1"),
            config.deepseek.resolved_key("DEEPSEEK_API_KEY"),
        )),
        Provider::Anthropic => Arc::new(AnthropicClient::new(
            model.clone(),
            config.anthropic.resolved_base_url("https://api.anthropic.com"),
            config.anthropic.resolved_key("ANTHROPIC_API_KEY"),
        )),
        Provider::Local => Arc::new(LocalClient::new(model.clone())),
    }
}

/// Shared HTTP client with the transport timeout applied.
fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client construction cannot fail with static options")
}

/// Map a transport-level failure onto the client error taxonomy.
fn transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(error.to_string())
    }
}

/// Map an HTTP error status onto the client error taxonomy.
///
/// 429 is the one retryable condition; everything else is a provider fault.
fn status_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ClientError::RateLimited
    } else {
        ClientError::Provider(format!("HTTP {}: {}", status.as_u16(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_matches_identity() {
        let config = FileProvidersConfig::default();

        let openai = build_client(&"gpt-4o".parse().unwrap(), &config);
        assert_eq!(openai.model().as_str(), "gpt-4o");

        let local = build_client(&"http://localhost:5013".parse().unwrap(), &config);
        assert_eq!(local.model().as_str(), "http://localhost:5013");
    }

    #[test]
    fn test_status_mapping() {
        assert!(
            status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down").is_rate_limited()
        );
        assert!(!status_error(reqwest::StatusCode::BAD_GATEWAY, "oops").is_rate_limited());
    }
}
