use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::submission::Submission;
use crate::models::task::Task;

/// Reviews left open longer than this are flagged to the teacher.
pub const REVIEW_STALE_AFTER_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderKind {
    OverdueSubmission,
    PendingReview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub recipient: String,
    pub reference: String,
    pub message: String,
}

/// A student's task as tracked by the admin roster.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub student: String,
    pub task: Task,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReminderReport {
    pub overdue_students: Vec<Reminder>,
    pub pending_reviews: Vec<Reminder>,
}

pub fn overdue_students(roster: &[RosterEntry], today: NaiveDate) -> Vec<Reminder> {
    roster
        .iter()
        .filter(|entry| entry.task.is_overdue(today))
        .map(|entry| Reminder {
            kind: ReminderKind::OverdueSubmission,
            recipient: entry.student.clone(),
            reference: entry.task.id.clone(),
            message: format!(
                "'{}' was due on {} and has not been submitted",
                entry.task.task_type.title(),
                entry.task.deadline
            ),
        })
        .collect()
}

pub fn pending_reviews(submissions: &[Submission], teacher: &str, now: DateTime<Utc>) -> Vec<Reminder> {
    submissions
        .iter()
        .filter(|s| s.waiting_longer_than(now, REVIEW_STALE_AFTER_DAYS))
        .map(|s| Reminder {
            kind: ReminderKind::PendingReview,
            recipient: teacher.to_string(),
            reference: s.id.clone(),
            message: format!(
                "'{}' from {} has waited more than {} days for review",
                s.title, s.student, REVIEW_STALE_AFTER_DAYS
            ),
        })
        .collect()
}
