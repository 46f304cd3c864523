use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FormatCheckRequest {
    #[validate(length(max = 20000, message = "Text is too long for a single check"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InsightRequest {
    #[validate(length(max = 200))]
    pub topic: String,
}

/// Free-form text from the writing assistant, or a fixed fallback message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdviceResponse {
    pub advice: String,
}
