use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::models::response::ErrorResponse;
use crate::models::session::Role;

/// Failures raised by the workflow rules themselves, independent of HTTP.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("Task {0} has been approved and can no longer be edited")]
    TaskLocked(String),

    #[error("Task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },

    #[error("Group is full ({capacity} members maximum)")]
    GroupFull { capacity: usize },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Submission {0} has already been reviewed")]
    AlreadyReviewed(String),

    #[error("File of {size} exceeds the {limit_mb} MB upload limit")]
    QuotaExceeded { size: String, limit_mb: u32 },

    #[error("This view is only available to the {expected:?} role")]
    RoleMismatch { expected: Role },

    #[error("Deletion must be explicitly confirmed")]
    ConfirmationRequired,

    #[error("Too many active sessions ({max} maximum), try again later")]
    SessionLimit { max: usize },
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        WorkflowError::NotFound { kind, id: id.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub enum ServiceError {
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InternalError(String),
    ServiceUnavailable(String),
    ValidationError(String),
    AuthenticationError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            ServiceError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ServiceError::AuthenticationError(msg) => write!(f, "Authentication Error: {}", msg),
        }
    }
}

fn error_body(message: &str) -> ErrorResponse {
    ErrorResponse {
        status: "error".to_string(),
        message: message.to_string(),
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Unauthorized(msg) => {
                log::error!("Unauthorized: {}", msg);
                HttpResponse::Unauthorized().json(error_body(msg))
            }
            ServiceError::Forbidden(msg) => {
                log::error!("Forbidden: {}", msg);
                HttpResponse::Forbidden().json(error_body(msg))
            }
            ServiceError::NotFound(msg) => {
                log::error!("Not Found: {}", msg);
                HttpResponse::NotFound().json(error_body(msg))
            }
            ServiceError::Conflict(msg) => {
                log::error!("Conflict: {}", msg);
                HttpResponse::Conflict().json(error_body(msg))
            }
            ServiceError::InternalError(msg) => {
                log::error!("Internal Error: {}", msg);
                // Internal details stay in the log
                HttpResponse::InternalServerError().json(error_body("Something went wrong"))
            }
            ServiceError::ServiceUnavailable(msg) => {
                log::error!("Service Unavailable: {}", msg);
                HttpResponse::ServiceUnavailable().json(error_body(msg))
            }
            ServiceError::ValidationError(msg) => {
                log::error!("Validation Error: {}", msg);
                HttpResponse::BadRequest().json(error_body(msg))
            }
            ServiceError::AuthenticationError(msg) => {
                log::error!("Authentication Error: {}", msg);
                HttpResponse::Unauthorized().json(error_body(msg))
            }
        }
    }
}

impl From<WorkflowError> for ServiceError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Validation(_)
            | WorkflowError::QuotaExceeded { .. }
            | WorkflowError::ConfirmationRequired => ServiceError::ValidationError(message),
            WorkflowError::TaskLocked(_)
            | WorkflowError::InvalidTransition { .. }
            | WorkflowError::GroupFull { .. }
            | WorkflowError::AlreadyReviewed(_) => ServiceError::Conflict(message),
            WorkflowError::NotFound { .. } => ServiceError::NotFound(message),
            WorkflowError::RoleMismatch { .. } => ServiceError::Forbidden(message),
            WorkflowError::SessionLimit { .. } => ServiceError::ServiceUnavailable(message),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ServiceError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ServiceError::AuthenticationError(format!("Session token error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn workflow_errors_map_to_distinct_statuses() {
        let cases = [
            (WorkflowError::validation("empty"), StatusCode::BAD_REQUEST),
            (WorkflowError::GroupFull { capacity: 5 }, StatusCode::CONFLICT),
            (WorkflowError::TaskLocked("t1".into()), StatusCode::CONFLICT),
            (WorkflowError::not_found("Task", "t9"), StatusCode::NOT_FOUND),
            (
                WorkflowError::RoleMismatch { expected: Role::Admin },
                StatusCode::FORBIDDEN,
            ),
            (WorkflowError::ConfirmationRequired, StatusCode::BAD_REQUEST),
            (
                WorkflowError::SessionLimit { max: 2 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            let service: ServiceError = err.into();
            assert_eq!(service.error_response().status(), status, "{}", service);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ServiceError::InternalError("disk on fire".into());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
