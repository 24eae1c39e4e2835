use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, is_unique_violation};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone, validate_username,
};

/// 管理员创建用户；教师与顾客会同时创建资料行
pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = user_data.phone.as_deref()
        && !phone.trim().is_empty()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                )),
            );
        }
    };

    let storage = service.get_storage(request)?;

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("Created {} user {}", user.role, user.username);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Username or email already exists"),
        )),
        Err(e) => {
            error!("User creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserCreationFailed,
                    "User creation failed",
                )),
            )
        }
    }
}
