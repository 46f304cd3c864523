use actix_web::{web, HttpRequest, HttpResponse, Result};
use validator::Validate;

use crate::config::AppConfig;
use crate::models::advice::{AdviceResponse, FormatCheckRequest};
use crate::models::profile::{average_score, ProfileResponse};
use crate::models::resource::Resource;
use crate::models::response::ApiResponse;
use crate::models::submission::Submission;
use crate::services::Advisor;
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::ServiceError;

/// Submission history, oldest first
#[utoipa::path(
    get,
    path = "/api/student/submissions",
    tag = "submissions",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Submissions retrieved", body = ApiResponse<Vec<Submission>>),
        (status = 403, description = "Not a student session", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_submissions(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/submissions");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let submissions = workspace.student_mut()?.submissions.clone();

    log::info!("Retrieved {} submissions", submissions.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success("Submissions retrieved successfully", submissions)))
}

/// A single submission with score and feedback
#[utoipa::path(
    get,
    path = "/api/student/submissions/{id}",
    tag = "submissions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission retrieved", body = ApiResponse<Submission>),
        (status = 404, description = "Submission not found", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_submission(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let submission_id = path.into_inner();
    log::info!("GET /api/student/submissions/{}", submission_id);

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let submission = workspace.student_mut()?.submission(&submission_id)?.clone();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Submission retrieved successfully", submission)))
}

#[utoipa::path(
    get,
    path = "/api/student/resources",
    tag = "resources",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Resources retrieved", body = ApiResponse<Vec<Resource>>)
    )
)]
pub async fn get_resources(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/resources");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let resources = workspace.student_mut()?.resources.list().to_vec();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Resources retrieved successfully", resources)))
}

#[utoipa::path(
    get,
    path = "/api/student/profile",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<ProfileResponse>)
    )
)]
pub async fn get_profile(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/profile");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;

    let profile = ProfileResponse {
        session: entry.session.clone(),
        upload_limit_mb: student.upload_limit_mb,
        average_score: average_score(&student.score_history),
        score_history: student.score_history.clone(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success("Profile retrieved successfully", profile)))
}

/// Ask the writing assistant to review report text.
/// One check at a time per session; a second request waits for the first.
#[utoipa::path(
    post,
    path = "/api/student/format-check",
    tag = "assistant",
    security(
        ("bearer_auth" = [])
    ),
    request_body = FormatCheckRequest,
    responses(
        (status = 200, description = "Advice, or a fallback message when the service is unavailable", body = ApiResponse<AdviceResponse>),
        (status = 400, description = "No text to check", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn format_check(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    advisor: web::Data<Advisor>,
    check_req: web::Json<FormatCheckRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/student/format-check - {} chars", check_req.text.len());

    let entry = current_session(&req, &store, &config)?;
    check_req.validate()?;

    {
        // Role check only; the workspace is not held during the remote call
        let mut workspace = entry.workspace.lock().await;
        workspace.student_mut()?;
    }

    let _gate = entry.format_gate.lock().await;
    let advice = advisor.check_format(&check_req.text).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Format check completed",
        AdviceResponse { advice },
    )))
}

pub fn student_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/student")
            .configure(super::task::task_config)
            .configure(super::group::group_config)
            .route("/submissions", web::get().to(get_submissions))
            .route("/submissions/{id}", web::get().to(get_submission))
            .route("/resources", web::get().to(get_resources))
            .route("/profile", web::get().to(get_profile))
            .route("/format-check", web::post().to(format_check)),
    );
}
