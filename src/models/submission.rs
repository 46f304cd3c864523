use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::task::Verdict;
use crate::utils::errors::WorkflowError;

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Reviewing,
    Approved,
    Rejected,
}

/// A historical record of submitted work and its review outcome.
/// `score` and `feedback` stay empty while the record is `Reviewing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub id: String,
    pub task_id: Option<String>,
    pub student: String,
    pub title: String,
    pub submit_time: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub score: Option<u8>,
    pub feedback: Option<String>,
    pub content: String,
    pub attachments: Vec<String>,
}

impl Submission {
    pub fn reviewing(
        id: &str,
        task_id: Option<&str>,
        student: &str,
        title: &str,
        submit_time: DateTime<Utc>,
        content: String,
        attachments: Vec<String>,
    ) -> Self {
        Submission {
            id: id.to_string(),
            task_id: task_id.map(str::to_string),
            student: student.to_string(),
            title: title.to_string(),
            submit_time,
            status: SubmissionStatus::Reviewing,
            score: None,
            feedback: None,
            content,
            attachments,
        }
    }

    pub fn review(&mut self, review: &ReviewRequest) -> Result<(), WorkflowError> {
        if self.status != SubmissionStatus::Reviewing {
            return Err(WorkflowError::AlreadyReviewed(self.id.clone()));
        }

        if review.verdict == Verdict::Approved && review.score.is_none() {
            return Err(WorkflowError::validation("An approved submission needs a score"));
        }
        if review.score.is_some_and(|score| score > MAX_SCORE) {
            return Err(WorkflowError::validation(format!("Score must be between 0 and {}", MAX_SCORE)));
        }

        self.status = match review.verdict {
            Verdict::Approved => SubmissionStatus::Approved,
            Verdict::Rejected => SubmissionStatus::Rejected,
        };
        self.score = review.score;
        self.feedback = review
            .feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        Ok(())
    }

    pub fn waiting_longer_than(&self, now: DateTime<Utc>, days: i64) -> bool {
        self.status == SubmissionStatus::Reviewing && now - self.submit_time > Duration::days(days)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    pub verdict: Verdict,
    #[validate(range(max = 100, message = "Score must be between 0 and 100"))]
    pub score: Option<u8>,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pending() -> Submission {
        Submission::reviewing(
            "102",
            Some("t2"),
            "Li Hua",
            "Process material submission",
            Utc.with_ymd_and_hms(2026, 11, 1, 9, 15, 0).unwrap(),
            "Uploaded interview recordings".into(),
            vec!["interview_01.mp3".into()],
        )
    }

    fn review(verdict: Verdict, score: Option<u8>, feedback: Option<&str>) -> ReviewRequest {
        ReviewRequest {
            verdict,
            score,
            feedback: feedback.map(str::to_string),
        }
    }

    #[test]
    fn reviewing_records_have_no_outcome() {
        let submission = pending();
        assert_eq!(submission.score, None);
        assert_eq!(submission.feedback, None);
    }

    #[test]
    fn approval_sets_score_and_feedback_together() {
        let mut submission = pending();
        submission
            .review(&review(Verdict::Approved, Some(92), Some("  Solid fieldwork ")))
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.score, Some(92));
        assert_eq!(submission.feedback.as_deref(), Some("Solid fieldwork"));
    }

    #[test]
    fn approval_without_score_is_refused() {
        let mut submission = pending();
        assert!(submission.review(&review(Verdict::Approved, None, None)).is_err());
        assert_eq!(submission.status, SubmissionStatus::Reviewing);
    }

    #[test]
    fn rejection_may_omit_the_score() {
        let mut submission = pending();
        submission
            .review(&review(Verdict::Rejected, None, Some("Interview consent forms missing")))
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Rejected);
        assert_eq!(submission.score, None);
    }

    #[test]
    fn a_review_is_final() {
        let mut submission = pending();
        submission.review(&review(Verdict::Rejected, None, None)).unwrap();

        let err = submission
            .review(&review(Verdict::Approved, Some(80), None))
            .unwrap_err();
        assert_eq!(err, WorkflowError::AlreadyReviewed("102".into()));
        assert_eq!(submission.status, SubmissionStatus::Rejected);
    }

    #[test]
    fn out_of_range_score_is_refused() {
        let mut submission = pending();
        assert!(submission.review(&review(Verdict::Approved, Some(101), None)).is_err());
        assert!(review(Verdict::Approved, Some(101), None).validate().is_err());
    }

    #[test]
    fn waiting_time_only_applies_to_open_reviews() {
        let mut submission = pending();
        let later = Utc.with_ymd_and_hms(2026, 11, 5, 9, 15, 0).unwrap();
        assert!(submission.waiting_longer_than(later, 3));
        assert!(!submission.waiting_longer_than(later, 4));

        submission.review(&review(Verdict::Approved, Some(90), None)).unwrap();
        assert!(!submission.waiting_longer_than(later, 3));
    }
}
