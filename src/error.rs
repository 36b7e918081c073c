//! Error types for the task planner.

/// Top-level error type for the server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Plan store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by plan operations. Each kind maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(#[from] LlmError),

    #[error("{0}")]
    Storage(StoreError),
}

impl From<StoreError> for PlanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => PlanError::NotFound(err.to_string()),
            other => PlanError::Storage(other),
        }
    }
}

/// Result type alias for the server.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_plan_not_found() {
        let err: PlanError = StoreError::NotFound {
            entity: "Plan".into(),
            id: "7".into(),
        }
        .into();
        match err {
            PlanError::NotFound(msg) => assert_eq!(msg, "Plan 7 not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn store_io_error_stays_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: PlanError = StoreError::Io(io).into();
        assert!(matches!(err, PlanError::Storage(StoreError::Io(_))));
    }

    #[test]
    fn upstream_error_keeps_raw_message() {
        let err: PlanError = LlmError::RequestFailed {
            provider: "gemini".into(),
            reason: "quota exceeded".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Provider gemini request failed: quota exceeded"
        );
    }
}
