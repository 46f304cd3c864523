use std::sync::Arc;

use crate::services::{GenerationError, TextGenerator};
use crate::utils::errors::WorkflowError;

const FORMAT_CHECK_NO_KEY: &str = "API Key not configured. Unable to perform AI format check.";
const FORMAT_CHECK_FAILED: &str = "Error performing AI analysis. Please try again later.";
const FORMAT_CHECK_EMPTY: &str = "No analysis returned.";

const INSIGHT_NO_KEY: &str = "API Key not configured.";
const INSIGHT_FAILED: &str = "Could not generate insight.";
const INSIGHT_EMPTY: &str = "No insight available.";

struct Fallbacks {
    no_key: &'static str,
    failed: &'static str,
    empty: &'static str,
}

/// Writing assistance backed by a [`TextGenerator`]. Remote failures are
/// turned into fixed advisory strings rather than errors.
#[derive(Clone)]
pub struct Advisor {
    generator: Arc<dyn TextGenerator>,
}

impl Advisor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Reviews report text for academic format, tone and structure.
    /// Blank input is refused without contacting the service.
    pub async fn check_format(&self, text: &str) -> Result<String, WorkflowError> {
        if text.trim().is_empty() {
            return Err(WorkflowError::validation("Paste some report text to check"));
        }

        let prompt = format!(
            "Analyze the following social survey report abstract/text for academic formatting, tone, \
             and logical structure. Provide a brief checklist of 'Pass' or 'Needs Improvement' and one \
             suggestion. Text: \"{}\"",
            text
        );

        Ok(self
            .ask(
                &prompt,
                Fallbacks {
                    no_key: FORMAT_CHECK_NO_KEY,
                    failed: FORMAT_CHECK_FAILED,
                    empty: FORMAT_CHECK_EMPTY,
                },
            )
            .await)
    }

    pub async fn teaching_insight(&self, topic: &str) -> Result<String, WorkflowError> {
        if topic.trim().is_empty() {
            return Err(WorkflowError::validation("Topic is required"));
        }

        let prompt = format!(
            "Provide a short, 2-sentence pedagogical insight for a teacher regarding student performance in: {}",
            topic.trim()
        );

        Ok(self
            .ask(
                &prompt,
                Fallbacks {
                    no_key: INSIGHT_NO_KEY,
                    failed: INSIGHT_FAILED,
                    empty: INSIGHT_EMPTY,
                },
            )
            .await)
    }

    async fn ask(&self, prompt: &str, fallbacks: Fallbacks) -> String {
        match self.generate_with_retry(prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => fallbacks.empty.to_string(),
            Err(GenerationError::MissingCredential) => {
                log::warn!("Text generation skipped: no API key configured");
                fallbacks.no_key.to_string()
            }
            Err(e) => {
                log::error!("Text generation failed: {}", e);
                fallbacks.failed.to_string()
            }
        }
    }

    /// One retry, and only for transient failures.
    async fn generate_with_retry(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        match self.generator.generate(prompt).await {
            Err(e) if e.is_transient() => {
                log::warn!("Transient text-generation failure, retrying once: {}", e);
                self.generator.generate(prompt).await
            }
            other => other,
        }
    }
}
