use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationListParams;
use crate::services::storage_error_response;

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    user_id: i64,
    query: NotificationListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_in_app_notifications(
            user_id,
            Some(query.pagination.page),
            Some(query.pagination.size),
            query.unread_only.unwrap_or(false),
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
