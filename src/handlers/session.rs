use actix_web::{web, HttpRequest, HttpResponse, Result};
use validator::Validate;

use crate::config::AppConfig;
use crate::models::response::ApiResponse;
use crate::models::session::{LoginRequest, LoginResponseData, SessionResponse};
use crate::store::SessionStore;
use crate::utils::auth::{current_session, issue_token};
use crate::utils::errors::ServiceError;

/// Start a session for a display name and role
#[utoipa::path(
    post,
    path = "/api/session/login",
    tag = "session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = ApiResponse<LoginResponseData>),
        (status = 400, description = "Validation error", body = crate::utils::errors::ServiceError),
        (status = 503, description = "Too many active sessions", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn login(
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    login_req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/session/login - {:?} login for: {}", login_req.role, login_req.name);

    login_req.validate()?;
    if login_req.name.trim().is_empty() {
        return Err(ServiceError::ValidationError("Name is required".to_string()));
    }

    let session = store.open(&login_req.name, login_req.role)?;
    let token = match issue_token(&session, &config) {
        Ok(token) => token,
        Err(e) => {
            store.close(&session.id);
            return Err(e);
        }
    };

    let response_data = LoginResponseData {
        token,
        session: SessionResponse::from(&session),
    };

    log::info!("Login successful for: {}", session.name);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", response_data)))
}

/// End the session and discard its workspace
#[utoipa::path(
    post,
    path = "/api/session/logout",
    tag = "session",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Logout successful", body = ApiResponse<bool>),
        (status = 401, description = "Unauthorized", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn logout(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/session/logout");

    let entry = current_session(&req, &store, &config)?;
    store.close(&entry.session.id);

    log::info!("Logout successful for: {}", entry.session.name);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Successfully logged out", true)))
}

/// Current session with its menu and landing view
#[utoipa::path(
    get,
    path = "/api/session/me",
    tag = "session",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session retrieved", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Unauthorized", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_me(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/session/me");

    let entry = current_session(&req, &store, &config)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Successfully retrieved session",
        SessionResponse::from(&entry.session),
    )))
}

pub fn session_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/session")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(get_me)),
    );
}
