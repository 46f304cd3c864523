use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;
use validator::Validate;

use crate::config::AppConfig;
use crate::models::group::{
    ChatMessage, GroupMember, GroupResponse, InviteRequest, SendMessageRequest, UpdateGroupRequest,
};
use crate::models::response::ApiResponse;
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::ServiceError;

/// The student's survey group
#[utoipa::path(
    get,
    path = "/api/student/group",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Group retrieved", body = ApiResponse<GroupResponse>),
        (status = 403, description = "Not a student session", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn get_group(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/group");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Group retrieved successfully",
        GroupResponse::from(&student.group),
    )))
}

/// Edit the group name and slogan
#[utoipa::path(
    put,
    path = "/api/student/group",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = ApiResponse<GroupResponse>),
        (status = 400, description = "Validation error", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn update_group(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    update_req: web::Json<UpdateGroupRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("PUT /api/student/group - Renaming to: {}", update_req.name);

    let entry = current_session(&req, &store, &config)?;
    update_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let student = workspace.student_mut()?;
    student.group.update_info(&update_req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Group updated successfully",
        GroupResponse::from(&student.group),
    )))
}

/// Invite a student into the group
#[utoipa::path(
    post,
    path = "/api/student/group/invite",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    request_body = InviteRequest,
    responses(
        (status = 201, description = "Member added", body = ApiResponse<GroupMember>),
        (status = 400, description = "Blank identifier", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Group is full", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn invite_member(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    invite_req: web::Json<InviteRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/student/group/invite - Inviting: {}", invite_req.identifier);

    let entry = current_session(&req, &store, &config)?;
    invite_req.validate()?;

    let mut workspace = entry.workspace.lock().await;
    let member = workspace.student_mut()?.invite(&invite_req.identifier)?.clone();

    log::info!("Member {} joined as {}", member.name, member.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Member invited successfully", member)))
}

/// Group chat transcript, oldest first
#[utoipa::path(
    get,
    path = "/api/student/group/chat",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Transcript retrieved", body = ApiResponse<Vec<ChatMessage>>)
    )
)]
pub async fn get_chat(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/student/group/chat");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let messages = workspace.student_mut()?.chat.messages().to_vec();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Transcript retrieved successfully", messages)))
}

/// Post a chat message. Blank text is accepted and ignored.
#[utoipa::path(
    post,
    path = "/api/student/group/chat",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message appended, or null data for blank text", body = ApiResponse<ChatMessage>)
    )
)]
pub async fn send_message(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    message_req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/student/group/chat");

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let sent = workspace
        .student_mut()?
        .send_chat(&message_req.text, Utc::now())
        .cloned();

    let response = match sent {
        Some(message) => ApiResponse::success("Message sent", message),
        None => {
            log::info!("Ignored blank chat message");
            ApiResponse {
                status: "success".to_string(),
                message: "Nothing to send".to_string(),
                data: None,
            }
        }
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn group_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/group")
            .route("", web::get().to(get_group))
            .route("", web::put().to(update_group))
            .route("/invite", web::post().to(invite_member))
            .route("/chat", web::get().to(get_chat))
            .route("/chat", web::post().to(send_message)),
    );
}
