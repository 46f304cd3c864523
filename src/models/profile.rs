use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::session::Session;

/// One bar of the learning-archive chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u8,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub session: Session,
    pub upload_limit_mb: u32,
    pub average_score: Option<f64>,
    pub score_history: Vec<ScoreRecord>,
}

pub fn average_score(history: &[ScoreRecord]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    let total: u32 = history.iter().map(|r| u32::from(r.score)).sum();
    Some(f64::from(total) / history.len() as f64)
}
