use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserStatus, requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, is_unique_violation, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_phone};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref mut email) = update_data.email {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Some(ref phone) = update_data.phone
        && !phone.trim().is_empty()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    // 管理员不能停用自己或修改自己的角色
    if RequireJWT::extract_user_id(request) == Some(user_id)
        && (update_data.role.is_some()
            || update_data.status.is_some_and(|s| s != UserStatus::Active))
    {
        return Ok(bad_request(
            ErrorCode::UserUpdateFailed,
            "Cannot change your own role or status",
        ));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                error!("Password hashing failed: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Password hashing failed",
                    )),
                );
            }
        }
    }

    let storage = service.get_storage(request)?;

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
        )),
        Err(e) => {
            error!("User update failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    "User update failed",
                )),
            )
        }
    }
}
