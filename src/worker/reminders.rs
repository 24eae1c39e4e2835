use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::Result;
use crate::models::bookings::entities::Booking;
use crate::models::templates::entities::{REMINDER_6H, REMINDER_24H};
use crate::services::Notifier;
use crate::storage::Storage;

/// 一次扫描中对某个预约要做的事
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderAction {
    pub template: &'static str,
    pub mark_24h: bool,
    pub mark_6h: bool,
}

/// 判断预约当前落在哪个提醒窗口
///
/// `(now, now+6h]` 发 6 小时提醒，同时标记 24 小时提醒已发送；
/// `(now+6h, now+24h]` 发 24 小时提醒。
pub fn classify(booking: &Booking, now: DateTime<Utc>) -> Option<ReminderAction> {
    let until_start = booking.start_time - now;
    if until_start <= Duration::zero() {
        return None;
    }

    if until_start <= Duration::hours(6) {
        (!booking.reminder_6h_sent).then_some(ReminderAction {
            template: REMINDER_6H,
            mark_24h: true,
            mark_6h: true,
        })
    } else if until_start <= Duration::hours(24) {
        (!booking.reminder_24h_sent).then_some(ReminderAction {
            template: REMINDER_24H,
            mark_24h: true,
            mark_6h: false,
        })
    } else {
        None
    }
}

pub async fn create_reminders(storage: &Arc<dyn Storage>, notifier: &Notifier) -> Result<usize> {
    let now = Utc::now();
    let bookings = storage
        .list_bookings_for_reminders(now, now + Duration::hours(24))
        .await?;

    let mut queued = 0;
    for booking in bookings {
        let Some(action) = classify(&booking, now) else {
            continue;
        };
        // 入队失败时不打标记，下一轮重试
        if let Err(e) = notifier.booking_reminder(&booking, action.template).await {
            warn!("Failed to queue {} for booking #{}: {}", action.template, booking.id, e);
            continue;
        }
        queued += 1;
        if let Err(e) = storage
            .mark_reminders_sent(booking.id, action.mark_24h, action.mark_6h)
            .await
        {
            warn!("Failed to mark reminders for booking #{}: {}", booking.id, e);
            continue;
        }
    }

    if queued > 0 {
        info!("Queued {} booking reminder(s)", queued);
    }
    Ok(queued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookings::entities::BookingStatus;
    use crate::models::packages::entities::SessionType;

    fn booking_in(hours: i64, now: DateTime<Utc>) -> Booking {
        let start = now + Duration::hours(hours);
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
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_24h_window() {
        let now = Utc::now();
        let action = classify(&booking_in(20, now), now).unwrap();
        assert_eq!(action.template, REMINDER_24H);
        assert!(action.mark_24h && !action.mark_6h);
    }

    #[test]
    fn test_6h_window_also_marks_24h() {
        let now = Utc::now();
        let action = classify(&booking_in(3, now), now).unwrap();
        assert_eq!(action.template, REMINDER_6H);
        assert!(action.mark_24h && action.mark_6h);
    }

    #[test]
    fn test_window_boundaries() {
        let now = Utc::now();
        assert_eq!(classify(&booking_in(24, now), now).unwrap().template, REMINDER_24H);
        assert_eq!(classify(&booking_in(6, now), now).unwrap().template, REMINDER_6H);
        assert!(classify(&booking_in(25, now), now).is_none());
        assert!(classify(&booking_in(0, now), now).is_none());
        assert!(classify(&booking_in(-1, now), now).is_none());
    }

    #[test]
    fn test_already_sent() {
        let now = Utc::now();
        let mut booking = booking_in(20, now);
        booking.reminder_24h_sent = true;
        assert!(classify(&booking, now).is_none());

        let mut booking = booking_in(2, now);
        booking.reminder_24h_sent = true;
        assert!(classify(&booking, now).is_some());
        booking.reminder_6h_sent = true;
        assert!(classify(&booking, now).is_none());
    }
}
