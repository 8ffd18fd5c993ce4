//! LLM client port
//!
//! Defines how the application layer talks to a text-generation service.
//! One instance exists per backing service and is shared by all concurrent
//! workers; it holds no per-dialogue state.

use async_trait::async_trait;
use clinicsim_domain::{Message, Model};
use thiserror::Error;

/// Errors a generation client can produce
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service throttled the call; retryable via the backoff policy
    #[error("Rate limited by backing service")]
    RateLimited,

    /// Upstream failure reported by the service; not retryable
    #[error("Provider error: {0}")]
    Provider(String),

    /// The transport gave up before the service answered
    #[error("Request timed out")]
    Timeout,

    /// The request never reached the service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with something we cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Only rate limits are worth retrying; everything else propagates.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ClientError::RateLimited)
    }
}

/// A client for one backing generation service
///
/// `inquire` is a stateless one-shot completion; `converse` continues a
/// dialogue given its full history. Replies are assistant messages derived
/// from the last message of the input, so they carry the calling
/// transcript's metadata (and the service-resolved chat id, if any).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// The validated identity this client was constructed for.
    fn model(&self) -> &Model;

    /// One-shot completion of a single prompt message.
    async fn inquire(&self, prompt: &Message) -> Result<Message, ClientError>;

    /// Completion given a full message history.
    async fn converse(&self, history: &[Message]) -> Result<Message, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(ClientError::RateLimited.is_rate_limited());
        assert!(!ClientError::Timeout.is_rate_limited());
        assert!(!ClientError::Provider("boom".to_string()).is_rate_limited());
    }
}
