use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::packages::entities::{Package, SessionType};
use crate::scheduling::BlockReason;
use crate::models::users::entities::UserRole;

define_string_enum! {
    /// 预约状态
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/booking.ts")]
    pub enum BookingStatus("预约状态") {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl BookingStatus {
    /// 占用教师时段的状态
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn can_transition(&self, to: BookingStatus) -> bool {
        matches!(
            (self, to),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }
}

define_string_enum! {
    /// 教师时间封锁类型
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/booking.ts")]
    pub enum BlockType("封锁类型") {
        Single => "single",
        MultiDay => "multi_day",
        Recurring => "recurring",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub teacher_id: i64,
    pub package_id: Option<i64>,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub note: Option<String>,
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub session_refunded: bool,
    pub reminder_24h_sent: bool,
    pub reminder_6h_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 取消时是否退还课时
    ///
    /// 教师与管理员取消一律退还；顾客需在开课前 `cancel_notice_hours` 小时以前取消。
    pub fn refund_on_cancel(
        &self,
        canceller_role: UserRole,
        now: DateTime<Utc>,
        cancel_notice_hours: i64,
    ) -> bool {
        if self.package_id.is_none() {
            return false;
        }
        if canceller_role.is_staff() {
            return true;
        }
        self.start_time - now >= Duration::hours(cancel_notice_hours)
    }

    /// 用户是否为该预约的参与者（顾客本人或任课教师）
    pub fn involves(&self, user_id: i64) -> bool {
        self.customer_id == user_id || self.teacher_id == user_id
    }
}

/// 教师不可预约的时间段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/booking.ts")]
pub struct TeacherBlock {
    pub id: i64,
    pub teacher_id: i64,
    pub block_type: BlockType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 周一 = 0
    pub recurrence_days: Vec<u8>,
    pub recurrence_until: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 事务内创建预约的结果
#[derive(Debug, Clone)]
pub enum BookingCreation {
    Created {
        booking: Booking,
        /// 扣减后的课程包
        package: Option<Package>,
    },
    SlotUnavailable(BlockReason),
    PackageUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(start: DateTime<Utc>) -> Booking {
        Booking {
            id: 1,
            customer_id: 10,
            teacher_id: 20,
            package_id: Some(5),
            session_type: SessionType::Private,
            start_time: start,
            end_time: start + Duration::hours(1),
            status: BookingStatus::Confirmed,
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
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition(Confirmed));
        assert!(Pending.can_transition(Cancelled));
        assert!(Confirmed.can_transition(Completed));
        assert!(Confirmed.can_transition(Cancelled));
        assert!(!Pending.can_transition(Completed));
        assert!(!Completed.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Confirmed));
        assert!(Pending.is_active() && Confirmed.is_active());
        assert!(!Cancelled.is_active());
    }

    #[test]
    fn test_refund_policy() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let early = booking(now + Duration::hours(30));
        let late = booking(now + Duration::hours(5));
        let boundary = booking(now + Duration::hours(24));

        assert!(early.refund_on_cancel(UserRole::Customer, now, 24));
        assert!(boundary.refund_on_cancel(UserRole::Customer, now, 24));
        assert!(!late.refund_on_cancel(UserRole::Customer, now, 24));
        assert!(late.refund_on_cancel(UserRole::Teacher, now, 24));
        assert!(late.refund_on_cancel(UserRole::Admin, now, 24));

        let mut unpaid = booking(now + Duration::hours(30));
        unpaid.package_id = None;
        assert!(!unpaid.refund_on_cancel(UserRole::Admin, now, 24));
    }

    #[test]
    fn test_block_type_parse() {
        assert_eq!("multi_day".parse::<BlockType>().unwrap(), BlockType::MultiDay);
        assert!("weekly".parse::<BlockType>().is_err());
    }
}
