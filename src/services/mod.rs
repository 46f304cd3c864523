pub mod advisor;
pub mod gemini;

use async_trait::async_trait;

pub use advisor::Advisor;
pub use gemini::GeminiClient;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote service returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Failures worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Timeout | GenerationError::Transport(_) => true,
            GenerationError::Remote { status, .. } => *status == 429 || *status >= 500,
            GenerationError::MissingCredential | GenerationError::Malformed(_) => false,
        }
    }
}

/// A remote text-generation model: prompt in, text out.
/// `Ok(None)` means the call succeeded but produced no text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_and_server_failures_are_transient() {
        assert!(GenerationError::Timeout.is_transient());
        assert!(GenerationError::Transport("reset".into()).is_transient());
        assert!(GenerationError::Remote { status: 503, body: String::new() }.is_transient());
        assert!(GenerationError::Remote { status: 429, body: String::new() }.is_transient());

        assert!(!GenerationError::Remote { status: 400, body: String::new() }.is_transient());
        assert!(!GenerationError::MissingCredential.is_transient());
        assert!(!GenerationError::Malformed("{}".into()).is_transient());
    }
}
