use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;

use crate::config::AppConfig;
use crate::models::draft::DraftText;
use crate::models::response::ApiResponse;
use crate::models::submission::Submission;
use crate::models::task::TaskResponse;
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::ServiceError;

/// Tasks of the current student with their drafts
#[utoipa::path(
    get,
    path = "/api/student/tasks",
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = ApiResponse<Vec<TaskResponse>>),
        (status = 401, description = "Unauthorized", body = crate::utils::errors::ServiceError),
        (status = 403, description = "Not a student session", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_tasks(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/tasks");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;

    let tasks: Vec<TaskResponse> = student
        .tasks_with_drafts()
        .into_iter()
        .map(|(task, draft)| TaskResponse::new(task, draft))
        .collect();

    log::info!("Retrieved {} tasks", tasks.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success("Tasks retrieved successfully", tasks)))
}

/// Replace the text fields of a task draft
#[utoipa::path(
    put,
    path = "/api/student/tasks/{id}/draft",
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = DraftText,
    responses(
        (status = 200, description = "Draft saved", body = ApiResponse<TaskResponse>),
        (status = 400, description = "Fields do not match the task type", body = crate::utils::errors::ServiceError),
        (status = 404, description = "Task not found", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Task already approved", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn update_draft(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    draft_req: web::Json<DraftText>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("PUT /api/student/tasks/{}/draft", task_id);

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;

    student.update_draft_text(&task_id, draft_req.into_inner())?;
    let (task, draft) = student.task(&task_id)?;

    log::info!("Draft saved for task: {}", task_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Draft saved", TaskResponse::new(task, draft))))
}

/// Submit the stored draft of a task
#[utoipa::path(
    post,
    path = "/api/student/tasks/{id}/submit",
    tag = "tasks",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task submitted", body = ApiResponse<Submission>),
        (status = 400, description = "Draft is empty", body = crate::utils::errors::ServiceError),
        (status = 404, description = "Task not found", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Task already approved", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn submit_task(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("POST /api/student/tasks/{}/submit", task_id);

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;

    let submission = student.submit_task(&task_id, Utc::now())?.clone();

    log::info!("Task {} submitted as submission {}", task_id, submission.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Task submitted successfully", submission)))
}

pub fn task_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(get_tasks))
            .route("/{id}/draft", web::put().to(update_draft))
            .route("/{id}/submit", web::post().to(submit_task))
            .configure(super::file::file_config),
    );
}
