use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{BookingService, booking_forbidden, can_teach, invalid_status, load_visible};
use crate::errors::StudioError;
use crate::models::{
    ApiResponse,
    bookings::{entities::BookingStatus, responses::BookingResponse},
};
use crate::services::{current_user, storage_error_response};

pub async fn get_booking(
    service: &BookingService,
    booking_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    match load_visible(storage.as_ref(), &me, booking_id).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BookingResponse { booking },
            "Booking retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}

/// pending → confirmed
pub async fn confirm_booking(
    service: &BookingService,
    booking_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let booking = match load_visible(storage.as_ref(), &me, booking_id).await {
        Ok(booking) => booking,
        Err(response) => return Ok(response),
    };
    if !can_teach(&me, &booking) {
        return Ok(booking_forbidden());
    }
    if booking.status != BookingStatus::Pending {
        return Ok(invalid_status(format!(
            "Only pending bookings can be confirmed (current: {})",
            booking.status
        )));
    }

    match storage
        .update_booking_status(booking_id, BookingStatus::Pending, BookingStatus::Confirmed)
        .await
    {
        Ok(Some(booking)) => {
            info!("Booking #{} confirmed by user {}", booking.id, me.id);
            service
                .notifier(storage.clone())
                .booking_confirmed(&booking)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BookingResponse { booking },
                "Booking confirmed",
            )))
        }
        Ok(None) => Ok(crate::services::not_found(
            crate::models::ErrorCode::BookingNotFound,
            "Booking not found",
        )),
        Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
        Err(e) => Ok(storage_error_response(&e)),
    }
}

/// confirmed → completed，只能在课程开始之后
pub async fn complete_booking(
    service: &BookingService,
    booking_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let booking = match load_visible(storage.as_ref(), &me, booking_id).await {
        Ok(booking) => booking,
        Err(response) => return Ok(response),
    };
    if !can_teach(&me, &booking) {
        return Ok(booking_forbidden());
    }
    if booking.status != BookingStatus::Confirmed {
        return Ok(invalid_status(format!(
            "Only confirmed bookings can be completed (current: {})",
            booking.status
        )));
    }
    if Utc::now() < booking.start_time {
        return Ok(invalid_status("Session has not started yet"));
    }

    match storage
        .update_booking_status(booking_id, BookingStatus::Confirmed, BookingStatus::Completed)
        .await
    {
        Ok(Some(booking)) => {
            info!("Booking #{} completed", booking.id);
            service
                .notifier(storage.clone())
                .booking_completed(&booking)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BookingResponse { booking },
                "Booking completed",
            )))
        }
        Ok(None) => Ok(crate::services::not_found(
            crate::models::ErrorCode::BookingNotFound,
            "Booking not found",
        )),
        Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
