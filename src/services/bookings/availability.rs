use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};

use super::BookingService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    bookings::{
        entities::TeacherBlock,
        requests::{AvailabilityCheckQuery, AvailabilityQuery},
        responses::{DayAvailabilityResponse, SlotView},
    },
    users::entities::{User, UserRole},
};
use crate::scheduling::{SlotBooking, evaluate_day, evaluate_slot};
use crate::services::{bad_request, current_user, storage_error_response};
use crate::storage::Storage;
use crate::utils::time::{local_day_start, parse_date};

/// 顾客查询时同时检查其自身的时间冲突
fn viewer_customer(user: &User) -> Option<i64> {
    (user.role == UserRole::Customer).then_some(user.id)
}

async fn load_context(
    storage: &dyn Storage,
    teacher_id: i64,
    customer_id: Option<i64>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<(Vec<SlotBooking>, Vec<TeacherBlock>)> {
    let bookings = storage
        .list_bookings_in_range(Some(teacher_id), customer_id, from, to, true)
        .await?
        .iter()
        .map(SlotBooking::from)
        .collect();
    let blocks = storage
        .list_teacher_blocks(Some(teacher_id), Some(from), Some(to))
        .await?;
    Ok((bookings, blocks))
}

/// 某位教师一整天的时段视图
pub async fn day_availability(
    service: &BookingService,
    query: AvailabilityQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;
    let rules = service.rules();

    let Ok(date) = parse_date(&query.date) else {
        return Ok(bad_request(ErrorCode::BadRequest, "date must be YYYY-MM-DD"));
    };
    let customer_id = viewer_customer(&me);
    let day_start = local_day_start(date, rules.offset);
    let day_end = day_start + Duration::days(1);

    let (bookings, blocks) =
        match load_context(storage.as_ref(), query.teacher_id, customer_id, day_start, day_end)
            .await
        {
            Ok(context) => context,
            Err(e) => return Ok(storage_error_response(&e)),
        };

    let slots = evaluate_day(
        date,
        query.teacher_id,
        query.session_type,
        customer_id,
        &bookings,
        &blocks,
        &rules,
        Utc::now(),
    )
    .into_iter()
    .map(|(range, availability)| SlotView {
        start_time: range.start,
        end_time: range.end,
        availability,
    })
    .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DayAvailabilityResponse {
            teacher_id: query.teacher_id,
            date: date.format("%Y-%m-%d").to_string(),
            slots,
        },
        "Availability retrieved successfully",
    )))
}

/// 判定单个时段
pub async fn check_availability(
    service: &BookingService,
    query: AvailabilityCheckQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;
    let rules = service.rules();

    let customer_id = viewer_customer(&me);
    let slot = rules.slot_at(
        query.teacher_id,
        query.start_time,
        query.session_type,
        customer_id,
    );

    let (bookings, blocks) = match load_context(
        storage.as_ref(),
        query.teacher_id,
        customer_id,
        slot.range.start,
        slot.range.end,
    )
    .await
    {
        Ok(context) => context,
        Err(e) => return Ok(storage_error_response(&e)),
    };

    let availability = evaluate_slot(&slot, &bookings, &blocks, &rules, Utc::now());
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SlotView {
            start_time: slot.range.start,
            end_time: slot.range.end,
            availability,
        },
        "Availability checked",
    )))
}
