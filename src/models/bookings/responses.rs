use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Booking, TeacherBlock};
use crate::models::common::PaginationInfo;
use crate::scheduling::SlotAvailability;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct BookingResponse {
    pub booking: Booking,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct BookingListResponse {
    pub items: Vec<Booking>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct CancelBookingResponse {
    pub booking: Booking,
    pub session_refunded: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct SlotView {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub availability: SlotAvailability,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct DayAvailabilityResponse {
    pub teacher_id: i64,
    pub date: String,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct CreateBlockResponse {
    pub block: TeacherBlock,
    /// 与新封锁重叠、需要人工处理的有效预约
    pub conflicts: Vec<Booking>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct BlockListResponse {
    pub items: Vec<TeacherBlock>,
}
