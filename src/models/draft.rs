use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::file::{Attachment, FileSlot};
use crate::models::task::{SurveyTheme, TaskType};
use crate::utils::errors::WorkflowError;

/// Form state of a task, one shape per task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskDraft {
    ThemeSelection {
        title: Option<String>,
        theme: Option<SurveyTheme>,
        scheme_file: Option<Attachment>,
    },
    ProcessMaterial {
        interview_file: Option<Attachment>,
        media_file: Option<Attachment>,
        data_file: Option<Attachment>,
        other_file: Option<Attachment>,
        description: Option<String>,
    },
    FinalReport {
        report_title: Option<String>,
        #[serde(rename = "abstract")]
        abstract_text: Option<String>,
        report_file: Option<Attachment>,
    },
}

/// Text portion of a draft. Replaces the current text fields wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftText {
    ThemeSelection {
        title: Option<String>,
        theme: Option<SurveyTheme>,
    },
    ProcessMaterial {
        description: Option<String>,
    },
    FinalReport {
        report_title: Option<String>,
        #[serde(rename = "abstract")]
        abstract_text: Option<String>,
    },
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl TaskDraft {
    pub fn empty(task_type: TaskType) -> Self {
        match task_type {
            TaskType::ThemeSelection => TaskDraft::ThemeSelection {
                title: None,
                theme: None,
                scheme_file: None,
            },
            TaskType::ProcessMaterial => TaskDraft::ProcessMaterial {
                interview_file: None,
                media_file: None,
                data_file: None,
                other_file: None,
                description: None,
            },
            TaskType::FinalReport => TaskDraft::FinalReport {
                report_title: None,
                abstract_text: None,
                report_file: None,
            },
        }
    }

    pub fn task_type(&self) -> TaskType {
        match self {
            TaskDraft::ThemeSelection { .. } => TaskType::ThemeSelection,
            TaskDraft::ProcessMaterial { .. } => TaskType::ProcessMaterial,
            TaskDraft::FinalReport { .. } => TaskType::FinalReport,
        }
    }

    /// True when at least one text field is non-blank, a theme is picked, or a file is attached.
    pub fn has_content(&self) -> bool {
        let text = match self {
            TaskDraft::ThemeSelection { title, theme, .. } => filled(title) || theme.is_some(),
            TaskDraft::ProcessMaterial { description, .. } => filled(description),
            TaskDraft::FinalReport {
                report_title,
                abstract_text,
                ..
            } => filled(report_title) || filled(abstract_text),
        };
        text || !self.attachments().is_empty()
    }

    pub fn attachments(&self) -> Vec<&Attachment> {
        let slots: Vec<&Option<Attachment>> = match self {
            TaskDraft::ThemeSelection { scheme_file, .. } => vec![scheme_file],
            TaskDraft::ProcessMaterial {
                interview_file,
                media_file,
                data_file,
                other_file,
                ..
            } => vec![interview_file, media_file, data_file, other_file],
            TaskDraft::FinalReport { report_file, .. } => vec![report_file],
        };
        slots.into_iter().flatten().collect()
    }

    fn slot_mut(&mut self, slot: FileSlot) -> Option<&mut Option<Attachment>> {
        match (self, slot) {
            (TaskDraft::ThemeSelection { scheme_file, .. }, FileSlot::Scheme) => Some(scheme_file),
            (TaskDraft::ProcessMaterial { interview_file, .. }, FileSlot::Interview) => Some(interview_file),
            (TaskDraft::ProcessMaterial { media_file, .. }, FileSlot::Media) => Some(media_file),
            (TaskDraft::ProcessMaterial { data_file, .. }, FileSlot::Data) => Some(data_file),
            (TaskDraft::ProcessMaterial { other_file, .. }, FileSlot::Other) => Some(other_file),
            (TaskDraft::FinalReport { report_file, .. }, FileSlot::Report) => Some(report_file),
            _ => None,
        }
    }

    /// Puts a file into (or clears) a slot, returning whatever was there before.
    pub fn set_file(
        &mut self,
        slot: FileSlot,
        file: Option<Attachment>,
    ) -> Result<Option<Attachment>, WorkflowError> {
        let task_type = self.task_type();
        let target = self.slot_mut(slot).ok_or_else(|| {
            WorkflowError::validation(format!("{:?} tasks have no {:?} file slot", task_type, slot))
        })?;
        Ok(std::mem::replace(target, file))
    }

    pub fn apply_text(&mut self, text: DraftText) -> Result<(), WorkflowError> {
        match (self, text) {
            (
                TaskDraft::ThemeSelection { title, theme, .. },
                DraftText::ThemeSelection {
                    title: new_title,
                    theme: new_theme,
                },
            ) => {
                *title = new_title;
                *theme = new_theme;
            }
            (
                TaskDraft::ProcessMaterial { description, .. },
                DraftText::ProcessMaterial {
                    description: new_description,
                },
            ) => {
                *description = new_description;
            }
            (
                TaskDraft::FinalReport {
                    report_title,
                    abstract_text,
                    ..
                },
                DraftText::FinalReport {
                    report_title: new_title,
                    abstract_text: new_abstract,
                },
            ) => {
                *report_title = new_title;
                *abstract_text = new_abstract;
            }
            (draft, _) => {
                return Err(WorkflowError::validation(format!(
                    "Fields do not match a {:?} task",
                    draft.task_type()
                )))
            }
        }
        Ok(())
    }

    /// One-line-per-field text stored with the submission record.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        match self {
            TaskDraft::ThemeSelection { title, theme, .. } => {
                if let Some(title) = title.as_deref().filter(|t| !t.trim().is_empty()) {
                    lines.push(format!("Survey title: {}", title.trim()));
                }
                if let Some(theme) = theme {
                    lines.push(format!("Theme: {:?}", theme));
                }
            }
            TaskDraft::ProcessMaterial { description, .. } => {
                if let Some(description) = description.as_deref().filter(|d| !d.trim().is_empty()) {
                    lines.push(description.trim().to_string());
                }
            }
            TaskDraft::FinalReport {
                report_title,
                abstract_text,
                ..
            } => {
                if let Some(title) = report_title.as_deref().filter(|t| !t.trim().is_empty()) {
                    lines.push(format!("Report title: {}", title.trim()));
                }
                if let Some(text) = abstract_text.as_deref().filter(|a| !a.trim().is_empty()) {
                    lines.push(format!("Abstract: {}", text.trim()));
                }
            }
        }

        if lines.is_empty() {
            lines.push(format!("{} file(s) uploaded", self.attachments().len()));
        }
        lines.join("\n")
    }
}
