use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{BookingService, invalid_status, load_visible};
use crate::config::AppConfig;
use crate::errors::StudioError;
use crate::models::{
    ApiResponse, ErrorCode,
    bookings::{
        entities::BookingStatus,
        requests::{CancelBooking, CancelBookingRequest},
        responses::CancelBookingResponse,
    },
};
use crate::services::{bad_request, current_user, not_found, storage_error_response};

const MAX_REASON_CHARS: usize = 500;

/// 取消预约
///
/// 顾客本人、任课教师或管理员均可取消。是否退还课时见 `Booking::refund_on_cancel`。
pub async fn cancel_booking(
    service: &BookingService,
    booking_id: i64,
    body: CancelBookingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let reason = body
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reason
        .as_deref()
        .is_some_and(|r| r.chars().count() > MAX_REASON_CHARS)
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            format!("Reason cannot exceed {MAX_REASON_CHARS} characters"),
        ));
    }

    // 参与者或管理员
    let booking = match load_visible(storage.as_ref(), &me, booking_id).await {
        Ok(booking) => booking,
        Err(response) => return Ok(response),
    };
    if !booking.status.can_transition(BookingStatus::Cancelled) {
        return Ok(invalid_status(format!(
            "Booking cannot be cancelled (current: {})",
            booking.status
        )));
    }

    let notice_hours = AppConfig::get().studio.cancel_notice_hours;
    let refund = booking.refund_on_cancel(me.role, Utc::now(), notice_hours);

    let cancel = CancelBooking {
        booking_id,
        cancelled_by: me.id,
        reason,
        refund,
    };

    match storage.cancel_booking(cancel).await {
        Ok(Some((booking, package))) => {
            info!(
                "Booking #{} cancelled by user {} (refunded: {}, remaining: {:?})",
                booking.id,
                me.id,
                booking.session_refunded,
                package.as_ref().map(|p| p.remaining_sessions)
            );
            service
                .notifier(storage.clone())
                .booking_cancelled(&booking, &me)
                .await;
            let session_refunded = booking.session_refunded;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CancelBookingResponse {
                    booking,
                    session_refunded,
                },
                "Booking cancelled",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::BookingNotFound, "Booking not found")),
        Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
