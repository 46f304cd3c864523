use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;
use validator::Validate;

use crate::config::AppConfig;
use crate::models::reminder::ReminderReport;
use crate::models::response::ApiResponse;
use crate::models::user::{AdminUserRecord, CreateUserRequest, DeleteUserQuery, UpdateUserRequest};
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::ServiceError;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Users retrieved", body = ApiResponse<Vec<AdminUserRecord>>),
        (status = 403, description = "Not an admin session", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_users(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/admin/users");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let users = workspace.admin_mut()?.registry.list().to_vec();

    log::info!("Retrieved {} users", users.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success("Users retrieved successfully", users)))
}

/// Add a user. Role defaults to Student and the upload quota to 50 MB.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<AdminUserRecord>),
        (status = 400, description = "Validation error", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn create_user(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    user_req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/admin/users - Creating user: {}", user_req.name);

    let entry = current_session(&req, &store, &config)?;
    user_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let user = workspace.admin_mut()?.registry.add(&user_req)?.clone();

    log::info!("User created with ID: {}", user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("User created successfully", user)))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<AdminUserRecord>),
        (status = 400, description = "Validation error", body = crate::utils::errors::ServiceError),
        (status = 404, description = "User not found", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn update_user(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<u64>,
    user_req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    log::info!("PUT /api/admin/users/{}", user_id);

    let entry = current_session(&req, &store, &config)?;
    user_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let user = workspace
        .admin_mut()?
        .registry
        .update(user_id, &user_req)?
        .clone();

    log::info!("User {} updated", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success("User updated successfully", user)))
}

/// Delete a user. Requires `?confirm=true`.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = u64, Path, description = "User ID"),
        ("confirm" = Option<bool>, Query, description = "Must be true to delete")
    ),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<AdminUserRecord>),
        (status = 400, description = "Deletion not confirmed", body = crate::utils::errors::ServiceError),
        (status = 404, description = "User not found", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn delete_user(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<u64>,
    query: web::Query<DeleteUserQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    log::info!("DELETE /api/admin/users/{}", user_id);

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let removed = workspace
        .admin_mut()?
        .registry
        .delete(user_id, query.confirm.unwrap_or(false))?;

    log::info!("User {} deleted", removed.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success("User deleted successfully", removed)))
}

/// Overdue students and reviews left waiting too long
#[utoipa::path(
    get,
    path = "/api/admin/reminders",
    tag = "reminders",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Reminders computed", body = ApiResponse<ReminderReport>)
    )
)]
pub async fn get_reminders(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/admin/reminders");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let report = workspace.admin_mut()?.reminders(Utc::now());

    log::info!(
        "{} overdue, {} pending reviews",
        report.overdue_students.len(),
        report.pending_reviews.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success("Reminders computed", report)))
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/users", web::get().to(get_users))
            .route("/users", web::post().to(create_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/reminders", web::get().to(get_reminders)),
    );
}
