use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::is_unique_violation;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone, validate_username,
};

use super::AuthService;

fn invalid(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::RegistrationFailed,
        message,
    ))
}

/// 注册只会创建顾客账号（同时创建顾客资料）
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&username) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(invalid(msg));
    }
    if let Some(phone) = register_request.phone.as_deref()
        && !phone.trim().is_empty()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_username(&username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Register lookup failed: {}", e);
            return Ok(crate::services::storage_error_response(&e));
        }
    }
    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Register lookup failed: {}", e);
            return Ok(crate::services::storage_error_response(&e));
        }
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegistrationFailed,
                    "Registration failed",
                )),
            );
        }
    };

    let create_request = CreateUserRequest {
        display_name: register_request
            .display_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(username.clone())),
        username,
        email,
        password: password_hash,
        role: UserRole::Customer,
        phone: register_request.phone,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            info!("Customer {} registered", user.username);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "Registration successful")))
        }
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Username or email already exists"),
        )),
        Err(e) => {
            error!("Registration failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegistrationFailed,
                    "Registration failed",
                )),
            )
        }
    }
}
