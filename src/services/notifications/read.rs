use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::notifications::responses::MarkAllReadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_error_response};

pub async fn mark_read(
    service: &NotificationService,
    request: &HttpRequest,
    user_id: i64,
    notification_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 他人的通知按不存在处理
    match storage.mark_notification_read(user_id, notification_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已标记为已读"))),
        Ok(false) => Ok(not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )),
        Err(e) => Ok(storage_error_response(&e)),
    }
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.mark_all_notifications_read(user_id).await {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "已全部标记为已读",
        ))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
