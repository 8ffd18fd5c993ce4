//! Model value object identifying a backing generation service

use crate::core::error::DomainError;

/// The service family behind a model identity (Value Object)
///
/// Determines which wire protocol an adapter speaks and how aggressively
/// the service rate-limits concurrent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Mistral,
    DeepSeek,
    /// A locally hosted single-prompt server, addressed by URL
    Local,
}

impl Provider {
    /// Maximum number of dialogue simulations that may run against this
    /// provider concurrently without tripping its rate limiter.
    ///
    /// Local servers process one request at a time; Anthropic throttles
    /// small-tier keys hard; the remaining APIs tolerate a larger default.
    pub fn max_concurrency(&self) -> usize {
        match self {
            Provider::Local => 1,
            Provider::Anthropic => 2,
            _ => 10,
        }
    }
}

/// A validated model identity (Value Object)
///
/// Parsed exactly once from the user-supplied identity string; call sites
/// match on the variant instead of re-inspecting the raw string.
///
/// # Example
///
/// ```
/// use clinicsim_domain::Model;
///
/// let model: Model = "gpt-4o-mini".parse().unwrap();
/// assert_eq!(model.as_str(), "gpt-4o-mini");
///
/// let local: Model = "koboldcpp+http://localhost:5001".parse().unwrap();
/// assert_eq!(local.as_str(), "http://localhost:5001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// OpenAI chat model, e.g. "gpt-4o"
    OpenAi(String),
    /// Anthropic model, e.g. "claude-3-haiku-20240307"
    Anthropic(String),
    /// Mistral model, e.g. "open-mixtral-8x7b"
    Mistral(String),
    /// DeepSeek chat model
    DeepSeek(String),
    /// Locally hosted server; the identity is its base URL
    Local(String),
}

impl Model {
    /// The identity string as sent to the backing service.
    ///
    /// For local servers this is the base URL.
    pub fn as_str(&self) -> &str {
        match self {
            Model::OpenAi(name)
            | Model::Anthropic(name)
            | Model::Mistral(name)
            | Model::DeepSeek(name)
            | Model::Local(name) => name,
        }
    }

    /// The provider family this identity belongs to.
    pub fn provider(&self) -> Provider {
        match self {
            Model::OpenAi(_) => Provider::OpenAi,
            Model::Anthropic(_) => Provider::Anthropic,
            Model::Mistral(_) => Provider::Mistral,
            Model::DeepSeek(_) => Provider::DeepSeek,
            Model::Local(_) => Provider::Local,
        }
    }

    /// Identity as embedded in persisted filenames.
    ///
    /// Bare network addresses are redacted to a placeholder so result files
    /// don't leak host/port details and stay filesystem-safe.
    pub fn redacted_name(&self) -> &str {
        match self {
            Model::Local(_) => "LOCAL_LLM",
            other => other.as_str(),
        }
    }

    /// Shortcut for [`Provider::max_concurrency`].
    pub fn max_concurrency(&self) -> usize {
        self.provider().max_concurrency()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The "koboldcpp+" scheme must be checked before the bare-URL case.
        if let Some(url) = s.strip_prefix("koboldcpp+") {
            if url.starts_with("http://") || url.starts_with("https://") {
                return Ok(Model::Local(url.to_string()));
            }
            return Err(DomainError::InvalidModel(s.to_string()));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Model::Local(s.to_string()));
        }
        if s.contains("gpt") {
            return Ok(Model::OpenAi(s.to_string()));
        }
        if s.contains("claude") {
            return Ok(Model::Anthropic(s.to_string()));
        }
        if s.contains("mistral") || s.contains("mixtral") {
            return Ok(Model::Mistral(s.to_string()));
        }
        if s.contains("deepseek") {
            return Ok(Model::DeepSeek(s.to_string()));
        }
        Err(DomainError::InvalidModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_families() {
        assert_eq!(
            "gpt-4o".parse::<Model>().unwrap(),
            Model::OpenAi("gpt-4o".to_string())
        );
        assert_eq!(
            "claude-3-haiku-20240307".parse::<Model>().unwrap(),
            Model::Anthropic("claude-3-haiku-20240307".to_string())
        );
        assert_eq!(
            "open-mixtral-8x7b".parse::<Model>().unwrap(),
            Model::Mistral("open-mixtral-8x7b".to_string())
        );
        assert_eq!(
            "deepseek-chat".parse::<Model>().unwrap(),
            Model::DeepSeek("deepseek-chat".to_string())
        );
    }

    #[test]
    fn test_parse_local_urls() {
        let local: Model = "http://localhost:5013".parse().unwrap();
        assert_eq!(local, Model::Local("http://localhost:5013".to_string()));

        let kobold: Model = "koboldcpp+http://localhost:5001".parse().unwrap();
        assert_eq!(kobold, Model::Local("http://localhost:5001".to_string()));
    }

    #[test]
    fn test_parse_unknown_identity_fails() {
        assert!("gemini-ultra".parse::<Model>().is_err());
        assert!("koboldcpp+localhost".parse::<Model>().is_err());
    }

    #[test]
    fn test_redaction() {
        let local: Model = "http://localhost:5013".parse().unwrap();
        assert_eq!(local.redacted_name(), "LOCAL_LLM");

        let api: Model = "gpt-4o".parse().unwrap();
        assert_eq!(api.redacted_name(), "gpt-4o");
    }

    #[test]
    fn test_concurrency_caps() {
        assert_eq!("http://h:1".parse::<Model>().unwrap().max_concurrency(), 1);
        assert_eq!("claude-3-opus".parse::<Model>().unwrap().max_concurrency(), 2);
        assert_eq!("gpt-4o".parse::<Model>().unwrap().max_concurrency(), 10);
    }
}
