use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::models::response::ApiResponse;
use crate::store::SessionStore;

pub async fn health_check(store: web::Data<SessionStore>) -> Result<HttpResponse> {
    let stats = store.stats();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Survey Workflow API is running",
        json!({
            "status": "ok",
            "sessions": {
                "total": stats.total(),
                "teachers": stats.teachers,
                "students": stats.students,
                "admins": stats.admins
            }
        }),
    )))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
