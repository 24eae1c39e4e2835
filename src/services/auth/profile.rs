use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::{bearer_token, user_cache_key};
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error_response};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_password_simple, validate_phone};

use super::AuthService;

fn invalid(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::UserUpdateFailed,
        message,
    ))
}

/// 修改本人资料；角色与状态只能由管理员修改
pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(invalid(msg));
        }
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != me.id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserAlreadyExists,
                    "Email already in use",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error_response(&e)),
        }
    }

    if let Some(ref phone) = update_data.phone
        && !phone.trim().is_empty()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(invalid(msg));
    }

    // 改密码需要当前密码；缓存中的用户不含哈希，重新读取
    let password = match update_data.new_password {
        Some(ref new_password) => {
            let stored = match storage.get_user_by_id(me.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "User not found",
                    )));
                }
                Err(e) => return Ok(storage_error_response(&e)),
            };
            let current = update_data.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, &stored.password_hash) {
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::AuthFailed,
                    "Current password is incorrect",
                )));
            }
            if let Err(msg) = validate_password_simple(new_password) {
                return Ok(invalid(msg));
            }
            match hash_password(new_password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(storage_error_response(&e)),
            }
        }
        None => None,
    };

    let update = UpdateUserRequest {
        email,
        password,
        display_name: update_data.display_name,
        phone: update_data.phone,
        ..Default::default()
    };

    match storage.update_user(me.id, update).await {
        Ok(Some(user)) => {
            if let Some(token) = bearer_token(request.headers()) {
                service.get_cache(request)?.remove(&user_cache_key(token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
