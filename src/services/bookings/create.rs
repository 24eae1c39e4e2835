use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info};

use super::BookingService;
use crate::models::{
    ApiResponse, ErrorCode,
    bookings::{
        entities::{BookingCreation, BookingStatus},
        requests::{CreateBookingRequest, NewBooking},
        responses::BookingResponse,
    },
    packages::entities::Package,
    users::entities::UserRole,
};
use crate::scheduling::SlotAvailability;
use crate::services::{bad_request, current_user, forbidden, not_found, storage_error_response};

const MAX_NOTE_CHARS: usize = 500;

fn package_unavailable(message: &str) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::PackageUnavailable,
        message,
    ))
}

/// 创建预约
///
/// 顾客为自己预约（待确认）；管理员代客预约（直接确认）。
/// 未指定课程包时选择最早到期且覆盖该时段的有效课程包。
pub async fn create_booking(
    service: &BookingService,
    body: CreateBookingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;
    let rules = service.rules();
    let now = Utc::now();

    let (customer_id, status) = match me.role {
        UserRole::Customer => {
            if body.customer_id.is_some_and(|id| id != me.id) {
                return Ok(forbidden(
                    ErrorCode::BookingPermissionDenied,
                    "Customers can only book for themselves",
                ));
            }
            (me.id, BookingStatus::Pending)
        }
        UserRole::Admin => match body.customer_id {
            Some(id) => (id, BookingStatus::Confirmed),
            None => {
                return Ok(bad_request(
                    ErrorCode::BadRequest,
                    "customer_id is required when booking on behalf of a customer",
                ));
            }
        },
        UserRole::Teacher => {
            return Ok(forbidden(
                ErrorCode::BookingPermissionDenied,
                "Teachers cannot create bookings",
            ));
        }
    };

    if body
        .note
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_NOTE_CHARS)
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            format!("Note cannot exceed {MAX_NOTE_CHARS} characters"),
        ));
    }

    match storage.get_customer(customer_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    }
    match storage.get_teacher(body.teacher_id).await {
        Ok(Some(teacher)) if teacher.is_active => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SlotUnavailable,
                "Teacher is not accepting bookings",
            )));
        }
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    }

    // 解析课程包；最终的余量检查在存储事务内完成
    let package_id = match body.package_id {
        Some(id) => id,
        None => {
            let candidates = match storage
                .list_active_packages(customer_id, body.session_type)
                .await
            {
                Ok(list) => list,
                Err(e) => return Ok(storage_error_response(&e)),
            };
            match Package::pick_for_session(&candidates, body.session_type, body.start_time) {
                Some(package) => package.id,
                None => {
                    return Ok(package_unavailable(
                        "No active package covers this session type and date",
                    ));
                }
            }
        }
    };

    let new_booking = NewBooking {
        customer_id,
        teacher_id: body.teacher_id,
        package_id: Some(package_id),
        session_type: body.session_type,
        start_time: body.start_time,
        end_time: body.start_time + rules.session_length(),
        status,
        note: body.note.filter(|n| !n.trim().is_empty()),
    };

    match storage.create_booking(new_booking, rules, now).await {
        Ok(BookingCreation::Created { booking, package }) => {
            info!(
                "Booking #{} created for customer {} with teacher {} at {}",
                booking.id, booking.customer_id, booking.teacher_id, booking.start_time
            );
            service
                .notifier(storage.clone())
                .booking_created(&booking, package.as_ref())
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                BookingResponse { booking },
                "Booking created successfully",
            )))
        }
        Ok(BookingCreation::SlotUnavailable(reason)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error(
                ErrorCode::SlotUnavailable,
                SlotAvailability::Blocked { reason },
                format!("Slot is not available: {reason}"),
            ),
        )),
        Ok(BookingCreation::PackageUnavailable) => Ok(package_unavailable(
            "Package cannot be used for this session",
        )),
        Err(e) => {
            error!("Booking creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::BookingCreationFailed,
                    "Booking creation failed",
                )),
            )
        }
    }
}
