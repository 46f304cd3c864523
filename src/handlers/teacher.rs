use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;
use validator::Validate;

use crate::config::AppConfig;
use crate::models::advice::{AdviceResponse, InsightRequest};
use crate::models::resource::{PublishResourceRequest, Resource};
use crate::models::response::ApiResponse;
use crate::models::submission::{ReviewRequest, Submission};
use crate::services::Advisor;
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::ServiceError;

/// Submissions waiting for (or done with) review
#[utoipa::path(
    get,
    path = "/api/teacher/reviews",
    tag = "grading",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review queue retrieved", body = ApiResponse<Vec<Submission>>),
        (status = 403, description = "Not a teacher session", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_reviews(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/teacher/reviews");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let queue = workspace.teacher_mut()?.review_queue.clone();

    log::info!("Retrieved {} submissions for review", queue.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success("Review queue retrieved successfully", queue)))
}

/// Approve or reject a submission
#[utoipa::path(
    post,
    path = "/api/teacher/reviews/{id}",
    tag = "grading",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Submission ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review recorded", body = ApiResponse<Submission>),
        (status = 400, description = "Missing or out-of-range score", body = crate::utils::errors::ServiceError),
        (status = 404, description = "Submission not found", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Already reviewed", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn review_submission(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    review_req: web::Json<ReviewRequest>,
) -> Result<HttpResponse, ServiceError> {
    let submission_id = path.into_inner();
    log::info!("POST /api/teacher/reviews/{} - {:?}", submission_id, review_req.verdict);

    let entry = current_session(&req, &store, &config)?;
    review_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let reviewed = workspace
        .teacher_mut()?
        .review(&submission_id, &review_req)?
        .clone();

    log::info!("Submission {} marked {:?}", reviewed.id, reviewed.status);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Review recorded successfully", reviewed)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/resources",
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
    log::info!("GET /api/teacher/resources");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let resources = workspace.teacher_mut()?.resources.list().to_vec();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Resources retrieved successfully", resources)))
}

/// Publish a course material to the resource center
#[utoipa::path(
    post,
    path = "/api/teacher/resources",
    tag = "resources",
    security(
        ("bearer_auth" = [])
    ),
    request_body = PublishResourceRequest,
    responses(
        (status = 201, description = "Resource published", body = ApiResponse<Resource>),
        (status = 400, description = "Validation error", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn publish_resource(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    publish_req: web::Json<PublishResourceRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/teacher/resources - Publishing: {}", publish_req.name);

    let entry = current_session(&req, &store, &config)?;
    publish_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let resource = workspace
        .teacher_mut()?
        .publish_resource(&publish_req.name, publish_req.size_bytes, Utc::now().date_naive())?
        .clone();

    log::info!("Resource published with ID: {}", resource.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Resource published successfully", resource)))
}

/// Short pedagogical insight on a topic
#[utoipa::path(
    post,
    path = "/api/teacher/insight",
    tag = "assistant",
    security(
        ("bearer_auth" = [])
    ),
    request_body = InsightRequest,
    responses(
        (status = 200, description = "Insight, or a fallback message when the service is unavailable", body = ApiResponse<AdviceResponse>),
        (status = 400, description = "No topic given", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn teaching_insight(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    advisor: web::Data<Advisor>,
    insight_req: web::Json<InsightRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/teacher/insight - Topic: {}", insight_req.topic);

    let entry = current_session(&req, &store, &config)?;
    insight_req.validate()?;

    {
        let mut workspace = entry.workspace.lock().await;
        workspace.teacher_mut()?;
    }

    let advice = advisor.teaching_insight(&insight_req.topic).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Insight generated",
        AdviceResponse { advice },
    )))
}

pub fn teacher_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/teacher")
            .route("/reviews", web::get().to(get_reviews))
            .route("/reviews/{id}", web::post().to(review_submission))
            .route("/resources", web::get().to(get_resources))
            .route("/resources", web::post().to(publish_resource))
            .route("/insight", web::post().to(teaching_insight)),
    );
}
