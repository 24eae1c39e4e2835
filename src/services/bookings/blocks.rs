use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::BookingService;
use crate::models::{
    ApiResponse, ErrorCode,
    bookings::{
        entities::{BlockType, Booking, TeacherBlock},
        requests::{BlockListParams, CreateBlockRequest, NewTeacherBlock},
        responses::{BlockListResponse, CreateBlockResponse},
    },
    users::entities::UserRole,
};
use crate::scheduling::{StudioRules, TimeRange, block_occurrences, validate_block};
use crate::services::{bad_request, current_user, forbidden, not_found, storage_error_response};

const MAX_REASON_CHARS: usize = 200;

/// 封锁可能影响的最晚时间
///
/// 未设置截止日期的周期封锁只检查可预约窗口内的预约。
fn conflict_horizon(block: &TeacherBlock, rules: &StudioRules, now: DateTime<Utc>) -> DateTime<Utc> {
    match block.block_type {
        BlockType::Single | BlockType::MultiDay => block.end_time,
        BlockType::Recurring => block
            .recurrence_until
            .map(|until| until + Duration::days(1))
            .unwrap_or_else(|| now + Duration::days(rules.max_days_ahead + 1)),
    }
}

/// 与封锁任一时段重叠的有效预约
pub(crate) fn conflicting_bookings(
    block: &TeacherBlock,
    bookings: Vec<Booking>,
    rules: &StudioRules,
) -> Vec<Booking> {
    bookings
        .into_iter()
        .filter(|b| b.teacher_id == block.teacher_id && b.status.is_active())
        .filter(|b| {
            let range = TimeRange::new(b.start_time, b.end_time);
            !block_occurrences(block, &range, rules.offset).is_empty()
        })
        .collect()
}

/// 教师为自己、管理员为任一教师创建封锁
///
/// 已有的重叠预约不会被自动取消，作为 `conflicts` 返回由人工处理。
pub async fn create_block(
    service: &BookingService,
    body: CreateBlockRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;
    let rules = service.rules();

    let teacher_id = match me.role {
        UserRole::Teacher => {
            if body.teacher_id.is_some_and(|id| id != me.id) {
                return Ok(forbidden(
                    ErrorCode::BookingPermissionDenied,
                    "Teachers can only block their own time",
                ));
            }
            me.id
        }
        UserRole::Admin => match body.teacher_id {
            Some(id) => id,
            None => return Ok(bad_request(ErrorCode::BlockInvalid, "teacher_id is required")),
        },
        UserRole::Customer => {
            return Ok(forbidden(
                ErrorCode::BookingPermissionDenied,
                "Customers cannot create blocks",
            ));
        }
    };

    if let Err(msg) = validate_block(
        body.block_type,
        body.start_time,
        body.end_time,
        &body.recurrence_days,
        body.recurrence_until,
        rules.offset,
    ) {
        return Ok(bad_request(ErrorCode::BlockInvalid, msg));
    }
    let reason = body
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reason
        .as_deref()
        .is_some_and(|r| r.chars().count() > MAX_REASON_CHARS)
    {
        return Ok(bad_request(
            ErrorCode::BlockInvalid,
            format!("Reason cannot exceed {MAX_REASON_CHARS} characters"),
        ));
    }

    match storage.get_teacher(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    }

    let mut recurrence_days = body.recurrence_days;
    recurrence_days.sort_unstable();
    recurrence_days.dedup();
    let is_recurring = body.block_type == BlockType::Recurring;

    let new_block = NewTeacherBlock {
        teacher_id,
        block_type: body.block_type,
        start_time: body.start_time,
        end_time: body.end_time,
        recurrence_days: if is_recurring { recurrence_days } else { Vec::new() },
        recurrence_until: if is_recurring { body.recurrence_until } else { None },
        reason,
        created_by: me.id,
    };

    let block = match storage.create_teacher_block(new_block).await {
        Ok(block) => block,
        Err(e) => return Ok(storage_error_response(&e)),
    };
    info!(
        "Teacher {} blocked {} from {} to {}",
        teacher_id, block.block_type, block.start_time, block.end_time
    );

    let now = Utc::now();
    let from = if is_recurring { block.start_time.max(now) } else { block.start_time };
    let to = conflict_horizon(&block, &rules, now);
    let conflicts = if from < to {
        match storage
            .list_bookings_in_range(Some(teacher_id), None, from, to, true)
            .await
        {
            Ok(bookings) => conflicting_bookings(&block, bookings, &rules),
            Err(e) => {
                warn!("Failed to check conflicts for block #{}: {}", block.id, e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateBlockResponse { block, conflicts },
        "Block created successfully",
    )))
}

/// 教师默认只看自己的封锁
pub async fn list_blocks(
    service: &BookingService,
    query: BlockListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let teacher_id = match me.role {
        UserRole::Teacher => Some(query.teacher_id.unwrap_or(me.id)),
        _ => query.teacher_id,
    };

    match storage
        .list_teacher_blocks(teacher_id, query.from, query.to)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BlockListResponse { items },
            "Blocks retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}

pub async fn delete_block(
    service: &BookingService,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let block = match storage.get_teacher_block(block_id).await {
        Ok(Some(block)) => block,
        Ok(None) => return Ok(not_found(ErrorCode::BlockNotFound, "Block not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    };
    if me.role != UserRole::Admin && block.teacher_id != me.id {
        return Ok(forbidden(
            ErrorCode::BookingPermissionDenied,
            "You can only delete your own blocks",
        ));
    }

    match storage.delete_teacher_block(block_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Block deleted"))),
        Ok(false) => Ok(not_found(ErrorCode::BlockNotFound, "Block not found")),
        Err(e) => Ok(storage_error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookings::entities::BookingStatus;
    use crate::models::packages::entities::SessionType;
    use chrono::TimeZone;

    fn block(block_type: BlockType, start: DateTime<Utc>, end: DateTime<Utc>) -> TeacherBlock {
        TeacherBlock {
            id: 1,
            teacher_id: 20,
            block_type,
            start_time: start,
            end_time: end,
            recurrence_days: vec![0],
            recurrence_until: None,
            reason: None,
            created_by: 20,
            created_at: start,
        }
    }

    fn booking(id: i64, teacher_id: i64, start: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id,
            customer_id: 10,
            teacher_id,
            package_id: None,
            session_type: SessionType::Private,
            start_time: start,
            end_time: start + Duration::hours(1),
            status,
            note: None,
            cancel_reason: None,
            cancelled_by: None,
            cancelled_at: None,
            session_refunded: false,
            reminder_24h_sent: false,
            reminder_6h_sent: false,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_conflicts_for_single_block() {
        let rules = StudioRules::default();
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap();
        let b = block(BlockType::Single, start, start + Duration::hours(3));

        let bookings = vec![
            booking(1, 20, start + Duration::hours(1), BookingStatus::Confirmed),
            booking(2, 20, start + Duration::hours(3), BookingStatus::Pending),
            booking(3, 21, start, BookingStatus::Confirmed),
            booking(4, 20, start, BookingStatus::Cancelled),
        ];
        let ids: Vec<i64> = conflicting_bookings(&b, bookings, &rules)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_conflicts_for_recurring_block() {
        let rules = StudioRules::default();
        // 2025-06-02 是周一；UTC 03:00 在 UTC+7 为 10:00
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap();
        let b = block(BlockType::Recurring, start, start + Duration::hours(2));

        let bookings = vec![
            booking(1, 20, start + Duration::days(7), BookingStatus::Confirmed),
            booking(2, 20, start + Duration::days(8), BookingStatus::Confirmed),
        ];
        let ids: Vec<i64> = conflicting_bookings(&b, bookings, &rules)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_conflict_horizon() {
        let rules = StudioRules::default();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap();
        let single = block(BlockType::Single, start, start + Duration::hours(2));
        assert_eq!(conflict_horizon(&single, &rules, now), single.end_time);

        let open_ended = block(BlockType::Recurring, start, start + Duration::hours(2));
        assert_eq!(
            conflict_horizon(&open_ended, &rules, now),
            now + Duration::days(rules.max_days_ahead + 1)
        );
    }
}
