//! LLM integration for the task planner.
//!
//! Supports:
//! - **Gemini**: the `generativelanguage` REST API via reqwest
//!
//! Everything above this module talks to the `LlmProvider` trait, so tests can
//! substitute a stub provider.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::error::{ConfigError, LlmError};

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "models/gemini-2.0-flash-001";

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    /// Read LLM settings from the environment. `GEMINI_API_KEY` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = std::env::var("PLANNER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            backend: LlmBackend::Gemini,
            api_key: secrecy::SecretString::from(api_key),
            model,
            base_url,
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => {
            tracing::info!("Using Gemini (model: {})", config.model);
            Ok(Arc::new(GeminiProvider::new(
                config.api_key.clone(),
                &config.model,
                &config.base_url,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_gemini_provider() {
        // The key is not checked until the first request.
        let config = LlmConfig {
            backend: LlmBackend::Gemini,
            api_key: secrecy::SecretString::from("test-key"),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        };
        let provider = create_provider(&config);
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().model_name(), DEFAULT_MODEL);
    }
}
