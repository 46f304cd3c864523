use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;
use futures_util::TryStreamExt;

use crate::config::AppConfig;
use crate::models::file::{
    format_file_size, upload_limit_bytes, validate_file, Attachment, FileSlot, UploadFileRequest,
};
use crate::models::response::ApiResponse;
use crate::store::SessionStore;
use crate::utils::auth::current_session;
use crate::utils::errors::{ServiceError, WorkflowError};

/// Attach a file to a draft slot
#[utoipa::path(
    post,
    path = "/api/student/tasks/{id}/files/{slot}",
    tag = "attachments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Task ID"),
        ("slot" = FileSlot, Path, description = "Draft slot to fill")
    ),
    request_body(
        content = inline(UploadFileRequest),
        description = "File to upload as multipart/form-data",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 201, description = "File attached", body = ApiResponse<Attachment>),
        (status = 400, description = "Type not allowed, over quota, or wrong slot", body = crate::utils::errors::ServiceError),
        (status = 404, description = "Task not found", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Task already approved", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn upload_file(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<(String, FileSlot)>,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let (task_id, slot) = path.into_inner();
    log::info!("POST /api/student/tasks/{}/files/{:?} - Uploading file", task_id, slot);

    let entry = current_session(&req, &store, &config)?;

    // Fail fast on a locked or unknown task before reading the body
    let limit_mb = {
        let mut workspace = entry.workspace.lock().await;
        let student = workspace.student_mut()?;
        student.task(&task_id)?.0.ensure_editable()?;
        student.upload_limit_mb
    };
    let limit_bytes = upload_limit_bytes(limit_mb);

    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        log::error!("Multipart error: {}", e);
        ServiceError::ValidationError("Invalid multipart data".to_string())
    })? {
        let file_name = match field.content_disposition().and_then(|cd| cd.get_filename()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        log::info!("Processing file: {}", file_name);

        // Only the size is kept; contents are counted and dropped
        let mut file_size: u64 = 0;
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            log::error!("File chunk error: {}", e);
            ServiceError::ValidationError("Error reading file data".to_string())
        })? {
            file_size += chunk.len() as u64;
            if file_size > limit_bytes {
                return Err(WorkflowError::QuotaExceeded {
                    size: format!("more than {}", format_file_size(limit_bytes)),
                    limit_mb,
                }
                .into());
            }
        }

        let mime_type = validate_file(&file_name, file_size, limit_mb)?;
        let attachment = Attachment::new(&file_name, file_size, mime_type.to_string(), Utc::now());

        let mut workspace = entry.workspace.lock().await;
        let replaced = workspace
            .student_mut()?
            .attach_file(&task_id, slot, attachment.clone())?;
        if let Some(previous) = replaced {
            log::info!("Replaced {} in slot {:?}", previous.file_name, slot);
        }

        log::info!("File attached: {} ({})", attachment.file_name, attachment.size_label);
        return Ok(HttpResponse::Created().json(ApiResponse::success("File uploaded successfully", attachment)));
    }

    Err(ServiceError::ValidationError("No file found in request".to_string()))
}

/// Remove the file held in a draft slot
#[utoipa::path(
    delete,
    path = "/api/student/tasks/{id}/files/{slot}",
    tag = "attachments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Task ID"),
        ("slot" = FileSlot, Path, description = "Draft slot to clear")
    ),
    responses(
        (status = 200, description = "File removed", body = ApiResponse<Attachment>),
        (status = 404, description = "Task or file not found", body = crate::utils::errors::ServiceError),
        (status = 409, description = "Task already approved", body = crate::utils::errors::ServiceError)
    )
)]
pub async fn delete_file(
    req: HttpRequest,
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<(String, FileSlot)>,
) -> Result<HttpResponse, ServiceError> {
    let (task_id, slot) = path.into_inner();
    log::info!("DELETE /api/student/tasks/{}/files/{:?}", task_id, slot);

    let entry = current_session(&req, &store, &config)?;
    let mut workspace = entry.workspace.lock().await;
    let removed = workspace.student_mut()?.remove_file(&task_id, slot)?;

    log::info!("File removed: {}", removed.file_name);
    Ok(HttpResponse::Ok().json(ApiResponse::success("File removed successfully", removed)))
}

pub fn file_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/files/{slot}", web::post().to(upload_file))
        .route("/{id}/files/{slot}", web::delete().to(delete_file));
}
