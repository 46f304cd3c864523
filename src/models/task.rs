use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::draft::TaskDraft;
use crate::utils::errors::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    ThemeSelection,
    ProcessMaterial,
    FinalReport,
}

impl TaskType {
    pub fn title(self) -> &'static str {
        match self {
            TaskType::ThemeSelection => "Survey theme confirmation",
            TaskType::ProcessMaterial => "Process material submission",
            TaskType::FinalReport => "Final survey report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyTheme {
    Politics,
    Economy,
    Culture,
    Society,
    Ecology,
}

/// Outcome of a teacher review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approved,
    Rejected,
}

/// One stage of the survey assignment.
///
/// Status moves `Pending -> Submitted -> Approved | Rejected`. A rejected task
/// may be submitted again; an approved one is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub deadline: NaiveDate,
    pub description: String,
}

impl Task {
    pub fn new(id: &str, task_type: TaskType, deadline: NaiveDate, description: &str) -> Self {
        Task {
            id: id.to_string(),
            task_type,
            status: TaskStatus::Pending,
            deadline,
            description: description.to_string(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.status == TaskStatus::Approved
    }

    pub fn ensure_editable(&self) -> Result<(), WorkflowError> {
        if self.is_locked() {
            return Err(WorkflowError::TaskLocked(self.id.clone()));
        }
        Ok(())
    }

    /// Moves the task to `Submitted` if the draft carries any content.
    /// On error the task is left untouched.
    pub fn submit(&mut self, draft: &TaskDraft) -> Result<(), WorkflowError> {
        self.ensure_editable()?;

        if draft.task_type() != self.task_type {
            return Err(WorkflowError::validation(format!(
                "Draft for {:?} cannot be submitted to a {:?} task",
                draft.task_type(),
                self.task_type
            )));
        }

        if !draft.has_content() {
            return Err(WorkflowError::validation(
                "Fill in at least one field or attach a file before submitting",
            ));
        }

        self.status = TaskStatus::Submitted;
        Ok(())
    }

    /// Applies a reviewer's verdict to a submitted task.
    ///
    /// No route calls this yet: teacher reviews land in the teacher session's
    /// own copy of the queue, and sessions share no state, so a running server
    /// never moves a student's task to `Approved` or `Rejected`. It takes effect
    /// once reviews and tasks live in a shared store.
    pub fn record_review(&mut self, verdict: Verdict) -> Result<(), WorkflowError> {
        if self.status != TaskStatus::Submitted {
            return Err(WorkflowError::InvalidTransition {
                task_id: self.id.clone(),
                from: format!("{:?}", self.status),
                to: format!("{:?}", verdict),
            });
        }

        self.status = match verdict {
            Verdict::Approved => TaskStatus::Approved,
            Verdict::Rejected => TaskStatus::Rejected,
        };
        Ok(())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.deadline && matches!(self.status, TaskStatus::Pending | TaskStatus::Rejected)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: String,
    pub task_type: TaskType,
    pub title: String,
    pub status: TaskStatus,
    pub deadline: NaiveDate,
    pub description: String,
    pub locked: bool,
    pub draft: TaskDraft,
}

impl TaskResponse {
    pub fn new(task: &Task, draft: &TaskDraft) -> Self {
        TaskResponse {
            id: task.id.clone(),
            task_type: task.task_type,
            title: task.task_type.title().to_string(),
            status: task.status,
            deadline: task.deadline,
            description: task.description.clone(),
            locked: task.is_locked(),
            draft: draft.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::DraftText;
    use crate::models::file::{Attachment, FileSlot};
    use chrono::Utc;

    fn deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
    }

    fn process_task() -> Task {
        Task::new("t2", TaskType::ProcessMaterial, deadline(), "Upload interview recordings")
    }

    fn draft_with_interview() -> TaskDraft {
        let mut draft = TaskDraft::empty(TaskType::ProcessMaterial);
        let file = Attachment::new("interview_01.mp3", 4096, "audio/mpeg".into(), Utc::now());
        draft.set_file(FileSlot::Interview, Some(file)).unwrap();
        draft
    }

    #[test]
    fn empty_draft_is_rejected_without_state_change() {
        for task_type in [TaskType::ThemeSelection, TaskType::ProcessMaterial, TaskType::FinalReport] {
            let mut task = Task::new("t", task_type, deadline(), "");
            let err = task.submit(&TaskDraft::empty(task_type)).unwrap_err();
            assert!(matches!(err, WorkflowError::Validation(_)));
            assert_eq!(task.status, TaskStatus::Pending);
        }
    }

    #[test]
    fn interview_file_alone_is_enough_to_submit() {
        let mut task = process_task();
        task.submit(&draft_with_interview()).unwrap();
        assert_eq!(task.status, TaskStatus::Submitted);
    }

    #[test]
    fn rejected_task_can_be_resubmitted() {
        let mut task = process_task();
        let draft = draft_with_interview();
        task.submit(&draft).unwrap();
        task.record_review(Verdict::Rejected).unwrap();
        assert_eq!(task.status, TaskStatus::Rejected);

        task.submit(&draft).unwrap();
        assert_eq!(task.status, TaskStatus::Submitted);
    }

    #[test]
    fn approved_task_is_frozen() {
        let mut task = process_task();
        let draft = draft_with_interview();
        task.submit(&draft).unwrap();
        task.record_review(Verdict::Approved).unwrap();

        assert!(task.is_locked());
        assert_eq!(task.submit(&draft), Err(WorkflowError::TaskLocked("t2".into())));
        assert_eq!(task.status, TaskStatus::Approved);
    }

    #[test]
    fn review_requires_a_submitted_task() {
        let mut task = process_task();
        let err = task.record_review(Verdict::Approved).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn mismatched_draft_type_is_refused() {
        let mut task = process_task();
        let mut draft = TaskDraft::empty(TaskType::FinalReport);
        draft
            .apply_text(DraftText::FinalReport {
                report_title: Some("Waste sorting".into()),
                abstract_text: None,
            })
            .unwrap();

        assert!(task.submit(&draft).is_err());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn overdue_only_counts_unfinished_work() {
        let mut task = process_task();
        let late = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        assert!(task.is_overdue(late));
        assert!(!task.is_overdue(deadline()));

        task.submit(&draft_with_interview()).unwrap();
        assert!(!task.is_overdue(late));
    }
}
