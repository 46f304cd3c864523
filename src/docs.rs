use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{admin, file, group, session, student, task, teacher};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Survey Workflow API",
        description = "Assignment workflow for a social survey course: tasks, submissions, grading, groups and administration"
    ),
    paths(
        session::login,
        session::logout,
        session::get_me,
        task::get_tasks,
        task::update_draft,
        task::submit_task,
        file::upload_file,
        file::delete_file,
        group::get_group,
        group::update_group,
        group::invite_member,
        group::get_chat,
        group::send_message,
        student::get_submissions,
        student::get_submission,
        student::get_resources,
        student::get_profile,
        student::format_check,
        teacher::get_reviews,
        teacher::review_submission,
        teacher::get_resources,
        teacher::publish_resource,
        teacher::teaching_insight,
        admin::get_users,
        admin::create_user,
        admin::update_user,
        admin::delete_user,
        admin::get_reminders,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "session", description = "Login and role menus"),
        (name = "tasks", description = "Student task drafts and submission"),
        (name = "attachments", description = "Files attached to drafts"),
        (name = "group", description = "Survey group and chat"),
        (name = "submissions", description = "Submission history"),
        (name = "resources", description = "Resource center"),
        (name = "profile", description = "Student profile"),
        (name = "assistant", description = "AI writing assistance"),
        (name = "grading", description = "Teacher review queue"),
        (name = "users", description = "User administration"),
        (name = "reminders", description = "Deadline and review reminders")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/session/login",
            "/api/student/tasks/{id}/files/{slot}",
            "/api/teacher/reviews/{id}",
            "/api/admin/reminders",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
