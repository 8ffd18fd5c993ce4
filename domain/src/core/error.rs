//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unsupported model identity: {0}")]
    InvalidModel(String),

    #[error("Unknown vignette source: {0}")]
    UnknownVignetteSource(String),

    #[error("Vignette is missing required field: {0}")]
    MissingVignetteField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_display() {
        let error = DomainError::InvalidModel("gemini-ultra".to_string());
        assert_eq!(error.to_string(), "Unsupported model identity: gemini-ultra");
    }
}
