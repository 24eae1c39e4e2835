pub mod auth;
pub mod bookings;
pub mod customers;
pub mod line;
pub mod notifications;
pub mod notifier;
pub mod package_requests;
pub mod packages;
pub mod reports;
pub mod teachers;
pub mod templates;
pub mod users;

pub use auth::AuthService;
pub use bookings::BookingService;
pub use customers::CustomerService;
pub use line::LineWebhookService;
pub use notifications::NotificationService;
pub use notifier::Notifier;
pub use package_requests::PackageRequestService;
pub use packages::PackageService;
pub use reports::ReportService;
pub use teachers::TeacherService;
pub use templates::TemplateService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, error::InternalError, web};
use std::sync::Arc;

use crate::errors::StudioError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 从 app_data 取共享组件（存储、缓存、LINE 客户端）
pub(crate) fn app_component<T: ?Sized + 'static>(
    request: &HttpRequest,
) -> actix_web::Result<Arc<T>> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!(
                "Missing app data: {}",
                std::any::type_name::<T>()
            );
            InternalError::from_response(
                "missing app data",
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Server is not fully initialized",
                )),
            )
            .into()
        })
}

/// 当前登录用户，未经过 RequireJWT 时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> actix_web::Result<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        InternalError::from_response(
            "unauthenticated",
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Authentication required",
            )),
        )
        .into()
    })
}

/// 唯一约束冲突（SQLite / PostgreSQL / MySQL 的报错文本各不相同）
pub(crate) fn is_unique_violation(err: &StudioError) -> bool {
    let msg = err.message();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("Duplicate entry")
}

/// 存储层错误映射为 HTTP 响应
pub(crate) fn storage_error_response(err: &StudioError) -> HttpResponse {
    match err {
        StudioError::Validation(msg) | StudioError::DateParse(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        }
        StudioError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg))
        }
        StudioError::Authentication(msg) => {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg))
        }
        StudioError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg))
        }
        StudioError::Conflict(msg) | StudioError::InvalidTransition(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg))
        }
        StudioError::PackageUnavailable(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::PackageUnavailable, msg)),
        other => {
            tracing::error!("{}", other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_unique_violation_detection() {
        assert!(is_unique_violation(&StudioError::database_operation(
            "UNIQUE constraint failed: users.username"
        )));
        assert!(is_unique_violation(&StudioError::database_operation(
            "duplicate key value violates unique constraint \"users_email_key\""
        )));
        assert!(!is_unique_violation(&StudioError::database_operation("disk I/O error")));
    }

    #[test]
    fn test_storage_error_status() {
        assert_eq!(
            storage_error_response(&StudioError::invalid_transition("x")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            storage_error_response(&StudioError::validation("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage_error_response(&StudioError::database_operation("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
