//! Per-session state behind each role's dashboard.
//!
//! Every login gets its own workspace seeded from the mock data; nothing is
//! shared between sessions.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::models::draft::{DraftText, TaskDraft};
use crate::models::file::{Attachment, FileSlot};
use crate::models::group::{ChatMessage, ChatTranscript, Group, GroupMember};
use crate::models::profile::ScoreRecord;
use crate::models::reminder::{self, ReminderReport, RosterEntry};
use crate::models::resource::{Resource, ResourceShelf};
use crate::models::session::{Role, Session};
use crate::models::submission::{ReviewRequest, Submission};
use crate::models::task::Task;
use crate::models::user::{UserRegistry, DEFAULT_UPLOAD_LIMIT_MB};
use crate::seed;
use crate::utils::errors::WorkflowError;

pub enum Workspace {
    Teacher(TeacherWorkspace),
    Student(StudentWorkspace),
    Admin(AdminWorkspace),
}

impl Workspace {
    pub fn for_session(session: &Session) -> Self {
        match session.role {
            Role::Teacher => Workspace::Teacher(TeacherWorkspace::seeded(&session.name)),
            Role::Student => Workspace::Student(StudentWorkspace::seeded(&session.name)),
            Role::Admin => Workspace::Admin(AdminWorkspace::seeded()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Workspace::Teacher(_) => Role::Teacher,
            Workspace::Student(_) => Role::Student,
            Workspace::Admin(_) => Role::Admin,
        }
    }

    pub fn student_mut(&mut self) -> Result<&mut StudentWorkspace, WorkflowError> {
        match self {
            Workspace::Student(ws) => Ok(ws),
            _ => Err(WorkflowError::RoleMismatch {
                expected: Role::Student,
            }),
        }
    }

    pub fn teacher_mut(&mut self) -> Result<&mut TeacherWorkspace, WorkflowError> {
        match self {
            Workspace::Teacher(ws) => Ok(ws),
            _ => Err(WorkflowError::RoleMismatch {
                expected: Role::Teacher,
            }),
        }
    }

    pub fn admin_mut(&mut self) -> Result<&mut AdminWorkspace, WorkflowError> {
        match self {
            Workspace::Admin(ws) => Ok(ws),
            _ => Err(WorkflowError::RoleMismatch { expected: Role::Admin }),
        }
    }
}

pub struct StudentWorkspace {
    pub student: String,
    pub tasks: Vec<Task>,
    drafts: HashMap<String, TaskDraft>,
    pub submissions: Vec<Submission>,
    pub group: Group,
    pub chat: ChatTranscript,
    pub resources: ResourceShelf,
    pub score_history: Vec<ScoreRecord>,
    pub upload_limit_mb: u32,
    next_submission: u32,
}

impl StudentWorkspace {
    pub fn new(
        student: &str,
        tasks: Vec<Task>,
        submissions: Vec<Submission>,
        group: Group,
        chat: ChatTranscript,
    ) -> Self {
        let next_submission = submissions
            .iter()
            .filter_map(|s| s.id.parse::<u32>().ok())
            .max()
            .unwrap_or(100)
            + 1;
        let drafts = tasks
            .iter()
            .map(|t| (t.id.clone(), TaskDraft::empty(t.task_type)))
            .collect();

        StudentWorkspace {
            student: student.to_string(),
            tasks,
            drafts,
            submissions,
            group,
            chat,
            resources: ResourceShelf::default(),
            score_history: Vec::new(),
            upload_limit_mb: DEFAULT_UPLOAD_LIMIT_MB,
            next_submission,
        }
    }

    pub fn seeded(student: &str) -> Self {
        let mut ws = StudentWorkspace::new(
            student,
            seed::tasks(),
            seed::submission_history(student),
            seed::group(student),
            seed::chat(student),
        );
        ws.resources = seed::resources();
        ws.score_history = seed::score_history();
        ws.upload_limit_mb = seed::upload_limit_mb(student);
        ws
    }

    fn task_index(&self, task_id: &str) -> Result<usize, WorkflowError> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| WorkflowError::not_found("Task", task_id))
    }

    pub fn task(&self, task_id: &str) -> Result<(&Task, &TaskDraft), WorkflowError> {
        let task = &self.tasks[self.task_index(task_id)?];
        let draft = self
            .drafts
            .get(task_id)
            .ok_or_else(|| WorkflowError::not_found("Draft", task_id))?;
        Ok((task, draft))
    }

    pub fn tasks_with_drafts(&self) -> Vec<(&Task, &TaskDraft)> {
        self.tasks
            .iter()
            .filter_map(|t| self.drafts.get(&t.id).map(|d| (t, d)))
            .collect()
    }

    fn editable_draft(&mut self, task_id: &str) -> Result<&mut TaskDraft, WorkflowError> {
        let index = self.task_index(task_id)?;
        self.tasks[index].ensure_editable()?;
        self.drafts
            .get_mut(task_id)
            .ok_or_else(|| WorkflowError::not_found("Draft", task_id))
    }

    pub fn update_draft_text(&mut self, task_id: &str, text: DraftText) -> Result<(), WorkflowError> {
        self.editable_draft(task_id)?.apply_text(text)
    }

    pub fn attach_file(&mut self, task_id: &str, slot: FileSlot, file: Attachment) -> Result<Option<Attachment>, WorkflowError> {
        self.editable_draft(task_id)?.set_file(slot, Some(file))
    }

    pub fn remove_file(&mut self, task_id: &str, slot: FileSlot) -> Result<Attachment, WorkflowError> {
        self.editable_draft(task_id)?
            .set_file(slot, None)?
            .ok_or_else(|| WorkflowError::not_found("File", format!("{}/{:?}", task_id, slot)))
    }

    /// Submits the stored draft and files a `Reviewing` record in the history.
    pub fn submit_task(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<&Submission, WorkflowError> {
        let index = self.task_index(task_id)?;
        let draft = self
            .drafts
            .get(task_id)
            .ok_or_else(|| WorkflowError::not_found("Draft", task_id))?;

        let task = &mut self.tasks[index];
        task.submit(draft)?;

        let id = self.next_submission.to_string();
        self.next_submission += 1;
        let submission = Submission::reviewing(
            &id,
            Some(task_id),
            &self.student,
            task.task_type.title(),
            now,
            draft.summary(),
            draft.attachments().iter().map(|a| a.file_name.clone()).collect(),
        );
        self.submissions.push(submission);

        let last = self.submissions.len() - 1;
        Ok(&self.submissions[last])
    }

    pub fn submission(&self, id: &str) -> Result<&Submission, WorkflowError> {
        self.submissions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| WorkflowError::not_found("Submission", id))
    }

    pub fn invite(&mut self, identifier: &str) -> Result<&GroupMember, WorkflowError> {
        self.group.invite(identifier)
    }

    pub fn send_chat(&mut self, text: &str, now: DateTime<Utc>) -> Option<&ChatMessage> {
        self.chat.send(&self.student, text, true, now)
    }
}

pub struct TeacherWorkspace {
    pub teacher: String,
    pub review_queue: Vec<Submission>,
    pub resources: ResourceShelf,
}

impl TeacherWorkspace {
    pub fn seeded(teacher: &str) -> Self {
        TeacherWorkspace {
            teacher: teacher.to_string(),
            review_queue: seed::review_queue(),
            resources: seed::resources(),
        }
    }

    pub fn review(&mut self, submission_id: &str, review: &ReviewRequest) -> Result<&Submission, WorkflowError> {
        let submission = self
            .review_queue
            .iter_mut()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| WorkflowError::not_found("Submission", submission_id))?;
        submission.review(review)?;
        Ok(&*submission)
    }

    pub fn publish_resource(&mut self, name: &str, size_bytes: u64, today: NaiveDate) -> Result<&Resource, WorkflowError> {
        self.resources.publish(name, size_bytes, today)
    }
}

pub struct AdminWorkspace {
    pub registry: UserRegistry,
    pub roster: Vec<RosterEntry>,
    pub open_submissions: Vec<Submission>,
    pub reviewer: String,
}

impl AdminWorkspace {
    pub fn seeded() -> Self {
        AdminWorkspace {
            registry: UserRegistry::new(seed::users()),
            roster: seed::roster(),
            open_submissions: seed::review_queue(),
            reviewer: seed::REVIEWER.to_string(),
        }
    }

    pub fn reminders(&self, now: DateTime<Utc>) -> ReminderReport {
        ReminderReport {
            overdue_students: reminder::overdue_students(&self.roster, now.date_naive()),
            pending_reviews: reminder::pending_reviews(&self.open_submissions, &self.reviewer, now),
        }
    }
}
