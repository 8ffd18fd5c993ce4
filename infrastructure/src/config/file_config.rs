//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file and are
//! deserialized directly.

use clinicsim_application::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Dialogue simulation settings
    pub dialogue: FileDialogueConfig,
    /// Backoff/retry settings for rate-limited services
    pub retry: FileRetryConfig,
    /// Result persistence settings
    pub results: FileResultsConfig,
    /// Per-provider credentials and endpoints
    pub providers: FileProvidersConfig,
}

/// Dialogue simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDialogueConfig {
    /// Length cap on the patient transcript
    pub max_len: usize,
    /// Directory holding `<source>_vignettes.jsonl` files
    pub vignette_dir: String,
}

impl Default for FileDialogueConfig {
    fn default() -> Self {
        Self {
            max_len: 24,
            vignette_dir: "vignettes".to_string(),
        }
    }
}

/// Backoff/retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub base_delay_secs: f64,
    pub factor: f64,
    pub max_delay_secs: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 3.0,
            factor: 1.5,
            max_delay_secs: 60.0,
        }
    }
}

impl FileRetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs_f64(self.base_delay_secs),
            self.factor,
            Duration::from_secs_f64(self.max_delay_secs),
        )
    }
}

/// Result persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResultsConfig {
    pub directory: String,
}

impl Default for FileResultsConfig {
    fn default() -> Self {
        Self {
            directory: "results".to_string(),
        }
    }
}

/// Credentials and endpoint for one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl FileProviderConfig {
    /// Configured key, falling back to the provider's conventional
    /// environment variable.
    pub fn resolved_key(&self, env_var: &str) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(env_var).ok())
            .unwrap_or_default()
    }

    /// Configured base URL, falling back to the provider's public endpoint.
    pub fn resolved_base_url(&self, default: &str) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| default.to_string())
    }
}

/// Per-provider configuration table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileProviderConfig,
    pub anthropic: FileProviderConfig,
    pub mistral: FileProviderConfig,
    pub deepseek: FileProviderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.dialogue.max_len, 24);
        assert_eq!(config.retry.base_delay_secs, 3.0);
        assert_eq!(config.retry.factor, 1.5);
        assert_eq!(config.results.directory, "results");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [dialogue]
            max_len = 12

            [providers.openai]
            api_key = "sk-test"
            "#,
        )
        .unwrap();

        assert_eq!(config.dialogue.max_len, 12);
        assert_eq!(config.retry.max_delay_secs, 60.0);
        assert_eq!(config.providers.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config
                .providers
                .mistral
                .resolved_base_url("https://api.mistral.ai/v1"),
            "https://api.mistral.ai/v1"
        );
    }
}
