use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BookingService;
use crate::models::{
    ApiResponse,
    bookings::requests::{BookingListParams, BookingListQuery},
    users::entities::UserRole,
};
use crate::services::{current_user, storage_error_response};

/// 顾客只看自己的预约，教师只看自己的课，管理员不限
pub async fn list_bookings(
    service: &BookingService,
    query: BookingListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (teacher_id, customer_id) = match me.role {
        UserRole::Customer => (query.teacher_id, Some(me.id)),
        UserRole::Teacher => (Some(me.id), query.customer_id),
        UserRole::Admin => (query.teacher_id, query.customer_id),
    };

    let list_query = BookingListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        teacher_id,
        customer_id,
        from: query.from,
        to: query.to,
    };

    match storage.list_bookings_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Booking list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
