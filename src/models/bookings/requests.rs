use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{BlockType, BookingStatus};
use crate::models::common::PaginationQuery;
use crate::models::packages::entities::SessionType;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct BookingListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<BookingStatus>,
    pub teacher_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// 预约列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<BookingStatus>,
    pub teacher_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct CreateBookingRequest {
    pub teacher_id: i64,
    /// 仅管理员代客预约时填写
    pub customer_id: Option<i64>,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    /// 不填则自动选择最早到期的可用课程包
    pub package_id: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct AvailabilityQuery {
    pub teacher_id: i64,
    /// 本地日期 YYYY-MM-DD
    pub date: String,
    pub session_type: Option<SessionType>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct AvailabilityCheckQuery {
    pub teacher_id: i64,
    pub start_time: DateTime<Utc>,
    pub session_type: Option<SessionType>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct CreateBlockRequest {
    /// 教师本人创建时可省略
    pub teacher_id: Option<i64>,
    pub block_type: BlockType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub recurrence_days: Vec<u8>,
    pub recurrence_until: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct BlockListParams {
    pub teacher_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 存储层新建预约
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: i64,
    pub teacher_id: i64,
    pub package_id: Option<i64>,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub note: Option<String>,
}

/// 存储层取消预约
#[derive(Debug, Clone)]
pub struct CancelBooking {
    pub booking_id: i64,
    pub cancelled_by: i64,
    pub reason: Option<String>,
    pub refund: bool,
}

/// 存储层新建封锁
#[derive(Debug, Clone)]
pub struct NewTeacherBlock {
    pub teacher_id: i64,
    pub block_type: BlockType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub recurrence_days: Vec<u8>,
    pub recurrence_until: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub created_by: i64,
}
