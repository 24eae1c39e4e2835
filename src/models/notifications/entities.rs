use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// LINE 推送状态
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/notification.ts")]
    pub enum NotificationStatus("推送状态") {
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
        Skipped => "skipped",
    }
}

define_string_enum! {
    /// 站内通知类型
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/notification.ts")]
    pub enum InAppNotificationType("站内通知类型") {
        BookingCreated => "booking_created",
        BookingConfirmed => "booking_confirmed",
        BookingCancelled => "booking_cancelled",
        BookingCompleted => "booking_completed",
        PackageApproved => "package_approved",
        PackageRejected => "package_rejected",
        PackageExpired => "package_expired",
        PackageAdjusted => "package_adjusted",
        PackageRequestSubmitted => "package_request_submitted",
        System => "system",
    }
}

define_string_enum! {
    /// 通知关联对象
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/notification.ts")]
    pub enum ReferenceType("关联类型") {
        Booking => "booking",
        Package => "package",
        PackageRequest => "package_request",
    }
}

/// 待发送的 LINE 消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub template_key: String,
    pub content: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: NotificationStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// 站内收件箱条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct InAppNotification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: InAppNotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 一次发送尝试的结果
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Sent,
    Skipped(String),
    Failed(String),
}

impl Notification {
    /// 根据发送结果计算新状态与尝试次数
    pub fn after_attempt(&self, outcome: &DeliveryOutcome, max_attempts: i32) -> (NotificationStatus, i32) {
        match outcome {
            DeliveryOutcome::Sent => (NotificationStatus::Sent, self.attempts + 1),
            DeliveryOutcome::Skipped(_) => (NotificationStatus::Skipped, self.attempts),
            DeliveryOutcome::Failed(_) => {
                let attempts = self.attempts + 1;
                if attempts >= max_attempts.max(1) {
                    (NotificationStatus::Failed, attempts)
                } else {
                    (NotificationStatus::Pending, attempts)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(attempts: i32) -> Notification {
        Notification {
            id: 1,
            user_id: 2,
            template_key: "reminder_24h".to_string(),
            content: "hello".to_string(),
            scheduled_at: Utc::now(),
            status: NotificationStatus::Pending,
            attempts,
            last_error: None,
            sent_at: None,
            reference_type: Some(ReferenceType::Booking),
            reference_id: Some(3),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_after_attempt() {
        let n = notification(0);
        assert_eq!(n.after_attempt(&DeliveryOutcome::Sent, 3), (NotificationStatus::Sent, 1));
        assert_eq!(
            n.after_attempt(&DeliveryOutcome::Skipped("no line id".into()), 3),
            (NotificationStatus::Skipped, 0)
        );
        assert_eq!(
            n.after_attempt(&DeliveryOutcome::Failed("timeout".into()), 3),
            (NotificationStatus::Pending, 1)
        );

        let last = notification(2);
        assert_eq!(
            last.after_attempt(&DeliveryOutcome::Failed("timeout".into()), 3),
            (NotificationStatus::Failed, 3)
        );
    }
}
