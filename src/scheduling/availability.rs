use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::{TimeRange, block_occurrences};
use crate::config::StudioConfig;
use crate::define_string_enum;
use crate::models::bookings::entities::{Booking, BookingStatus, TeacherBlock};
use crate::models::packages::entities::SessionType;
use crate::utils::time::{local_date, local_day_start, studio_offset};

define_string_enum! {
    /// 时段不可预约的原因
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/availability.ts")]
    pub enum BlockReason("不可预约原因") {
        InPast => "in_past",
        AdvanceNotice => "advance_notice",
        TooFarAhead => "too_far_ahead",
        OutsideBusinessHours => "outside_business_hours",
        TeacherBlocked => "teacher_blocked",
        PrivateSession => "private_session",
        Full => "full",
        SessionTypeMismatch => "session_type_mismatch",
        CustomerConflict => "customer_conflict",
    }
}

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/availability.ts")]
pub enum SlotAvailability {
    Open,
    /// 双人/小班课已有预约但仍有名额
    Partial {
        session_type: SessionType,
        booked: u32,
        capacity: u32,
    },
    Blocked {
        reason: BlockReason,
    },
}

impl SlotAvailability {
    pub fn is_bookable(&self) -> bool {
        !matches!(self, SlotAvailability::Blocked { .. })
    }

    pub fn blocked_reason(&self) -> Option<BlockReason> {
        match self {
            SlotAvailability::Blocked { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// 参与判定的既有预约
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotBooking {
    pub customer_id: i64,
    pub teacher_id: i64,
    pub session_type: SessionType,
    pub status: BookingStatus,
    pub range: TimeRange,
}

impl From<&Booking> for SlotBooking {
    fn from(b: &Booking) -> Self {
        Self {
            customer_id: b.customer_id,
            teacher_id: b.teacher_id,
            session_type: b.session_type,
            status: b.status,
            range: TimeRange::new(b.start_time, b.end_time),
        }
    }
}

/// 待判定的时段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRequest {
    pub teacher_id: i64,
    pub range: TimeRange,
    pub session_type: Option<SessionType>,
    /// 给出时检查该顾客自身的时间冲突
    pub customer_id: Option<i64>,
}

/// 营业规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioRules {
    pub offset: FixedOffset,
    pub open_hour: u32,
    pub close_hour: u32,
    pub session_minutes: i64,
    pub slot_step_minutes: i64,
    pub advance_notice_hours: i64,
    pub max_days_ahead: i64,
    pub duo_capacity: u32,
    pub group_capacity: u32,
}

impl From<&StudioConfig> for StudioRules {
    fn from(c: &StudioConfig) -> Self {
        Self {
            offset: studio_offset(c.utc_offset_minutes),
            open_hour: c.open_hour,
            close_hour: c.close_hour,
            session_minutes: c.session_minutes.max(1),
            slot_step_minutes: c.slot_step_minutes.max(1),
            advance_notice_hours: c.advance_notice_hours,
            max_days_ahead: c.max_days_ahead,
            duo_capacity: c.duo_capacity,
            group_capacity: c.group_capacity,
        }
    }
}

impl Default for StudioRules {
    fn default() -> Self {
        Self::from(&StudioConfig::default())
    }
}

impl StudioRules {
    pub fn session_length(&self) -> Duration {
        Duration::minutes(self.session_minutes)
    }

    pub fn capacity(&self, session_type: SessionType) -> u32 {
        session_type.capacity(self.duo_capacity, self.group_capacity)
    }

    /// 本地营业时间 `[open_hour, close_hour)`
    pub fn business_hours(&self, date: NaiveDate) -> TimeRange {
        let day_start = local_day_start(date, self.offset);
        TimeRange::new(
            day_start + Duration::hours(self.open_hour as i64),
            day_start + Duration::hours(self.close_hour as i64),
        )
    }

    /// 以开始时间构造一个标准课时长度的请求
    pub fn slot_at(
        &self,
        teacher_id: i64,
        start: DateTime<Utc>,
        session_type: Option<SessionType>,
        customer_id: Option<i64>,
    ) -> SlotRequest {
        SlotRequest {
            teacher_id,
            range: TimeRange::starting_at(start, self.session_length()),
            session_type,
            customer_id,
        }
    }
}

/// 判定单个时段，按顺序检查，命中第一条规则即返回
pub fn evaluate_slot(
    request: &SlotRequest,
    bookings: &[SlotBooking],
    blocks: &[TeacherBlock],
    rules: &StudioRules,
    now: DateTime<Utc>,
) -> SlotAvailability {
    let blocked = |reason| SlotAvailability::Blocked { reason };
    let slot = &request.range;

    if slot.start <= now {
        return blocked(BlockReason::InPast);
    }
    if slot.start < now + Duration::hours(rules.advance_notice_hours) {
        return blocked(BlockReason::AdvanceNotice);
    }
    if slot.start > now + Duration::days(rules.max_days_ahead) {
        return blocked(BlockReason::TooFarAhead);
    }

    let hours = rules.business_hours(local_date(slot.start, rules.offset));
    if slot.is_empty() || slot.start < hours.start || slot.end > hours.end {
        return blocked(BlockReason::OutsideBusinessHours);
    }

    let teacher_blocked = blocks
        .iter()
        .filter(|b| b.teacher_id == request.teacher_id)
        .any(|b| !block_occurrences(b, slot, rules.offset).is_empty());
    if teacher_blocked {
        return blocked(BlockReason::TeacherBlocked);
    }

    let active_overlapping = |b: &&SlotBooking| b.status.is_active() && b.range.overlaps(slot);

    if let Some(customer_id) = request.customer_id {
        let clash = bookings
            .iter()
            .filter(active_overlapping)
            .any(|b| b.customer_id == customer_id);
        if clash {
            return blocked(BlockReason::CustomerConflict);
        }
    }

    let occupying: Vec<&SlotBooking> = bookings
        .iter()
        .filter(active_overlapping)
        .filter(|b| b.teacher_id == request.teacher_id)
        .collect();

    let Some(first) = occupying.first() else {
        return SlotAvailability::Open;
    };
    if occupying
        .iter()
        .any(|b| b.session_type == SessionType::Private)
    {
        return blocked(BlockReason::PrivateSession);
    }
    let occupied_type = first.session_type;
    if occupying.iter().any(|b| b.session_type != occupied_type) {
        return blocked(BlockReason::Full);
    }
    if request
        .session_type
        .is_some_and(|requested| requested != occupied_type)
    {
        return blocked(BlockReason::SessionTypeMismatch);
    }

    let capacity = rules.capacity(occupied_type);
    let booked = occupying.len() as u32;
    if booked >= capacity {
        return blocked(BlockReason::Full);
    }
    SlotAvailability::Partial {
        session_type: occupied_type,
        booked,
        capacity,
    }
}

/// 某个本地日期的候选时段
pub fn day_slots(date: NaiveDate, rules: &StudioRules) -> Vec<TimeRange> {
    let hours = rules.business_hours(date);
    let length = rules.session_length();
    let step = Duration::minutes(rules.slot_step_minutes);

    let mut slots = Vec::new();
    let mut start = hours.start;
    while start + length <= hours.end {
        slots.push(TimeRange::starting_at(start, length));
        start += step;
    }
    slots
}

/// 判定一整天的所有时段
#[allow(clippy::too_many_arguments)]
pub fn evaluate_day(
    date: NaiveDate,
    teacher_id: i64,
    session_type: Option<SessionType>,
    customer_id: Option<i64>,
    bookings: &[SlotBooking],
    blocks: &[TeacherBlock],
    rules: &StudioRules,
    now: DateTime<Utc>,
) -> Vec<(TimeRange, SlotAvailability)> {
    day_slots(date, rules)
        .into_iter()
        .map(|range| {
            let request = SlotRequest {
                teacher_id,
                range,
                session_type,
                customer_id,
            };
            (range, evaluate_slot(&request, bookings, blocks, rules, now))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookings::entities::BlockType;
    use crate::utils::time::local_to_utc;
    use chrono::NaiveTime;

    const TEACHER: i64 = 20;
    const OTHER_TEACHER: i64 = 21;
    const CUSTOMER: i64 = 10;

    fn rules() -> StudioRules {
        StudioRules::default()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        local_to_utc(date(), NaiveTime::from_hms_opt(h, m, 0).unwrap(), rules().offset)
    }

    /// 判定时刻：前一天中午
    fn now() -> DateTime<Utc> {
        local(12, 0) - Duration::days(1)
    }

    fn booking(teacher_id: i64, customer_id: i64, session_type: SessionType, h: u32) -> SlotBooking {
        SlotBooking {
            customer_id,
            teacher_id,
            session_type,
            status: BookingStatus::Confirmed,
            range: TimeRange::starting_at(local(h, 0), Duration::hours(1)),
        }
    }

    fn request(h: u32, session_type: Option<SessionType>, customer_id: Option<i64>) -> SlotRequest {
        rules().slot_at(TEACHER, local(h, 0), session_type, customer_id)
    }

    fn check(req: &SlotRequest, bookings: &[SlotBooking], blocks: &[TeacherBlock]) -> SlotAvailability {
        evaluate_slot(req, bookings, blocks, &rules(), now())
    }

    fn reason(availability: SlotAvailability) -> Option<BlockReason> {
        availability.blocked_reason()
    }

    #[test]
    fn test_open_slot() {
        let req = request(10, Some(SessionType::Private), Some(CUSTOMER));
        assert_eq!(check(&req, &[], &[]), SlotAvailability::Open);
    }

    #[test]
    fn test_time_rules() {
        let req = request(10, None, None);
        let r = rules();

        // 已过去
        let past = evaluate_slot(&req, &[], &[], &r, local(10, 0));
        assert_eq!(reason(past), Some(BlockReason::InPast));

        // 不足 2 小时提前量
        let short = evaluate_slot(&req, &[], &[], &r, local(8, 30));
        assert_eq!(reason(short), Some(BlockReason::AdvanceNotice));
        let exact = evaluate_slot(&req, &[], &[], &r, local(8, 0));
        assert_eq!(exact, SlotAvailability::Open);

        // 超过 60 天
        let far = evaluate_slot(&req, &[], &[], &r, local(10, 0) - Duration::days(61));
        assert_eq!(reason(far), Some(BlockReason::TooFarAhead));
    }

    #[test]
    fn test_business_hours() {
        assert_eq!(
            reason(check(&request(6, None, None), &[], &[])),
            Some(BlockReason::OutsideBusinessHours)
        );
        // 20:00-21:00 刚好在营业时间内，20:30 开始则超出
        assert_eq!(check(&request(20, None, None), &[], &[]), SlotAvailability::Open);
        let late = rules().slot_at(TEACHER, local(20, 30), None, None);
        assert_eq!(
            reason(check(&late, &[], &[])),
            Some(BlockReason::OutsideBusinessHours)
        );
    }

    #[test]
    fn test_teacher_block() {
        let lunch = TeacherBlock {
            id: 1,
            teacher_id: TEACHER,
            block_type: BlockType::Recurring,
            start_time: local(12, 0) - Duration::days(8),
            end_time: local(13, 0) - Duration::days(8),
            recurrence_days: vec![0, 1, 2, 3, 4],
            recurrence_until: None,
            reason: Some("lunch".into()),
            created_by: TEACHER,
            created_at: now(),
        };
        assert_eq!(
            reason(check(&request(12, None, None), &[], &[lunch.clone()])),
            Some(BlockReason::TeacherBlocked)
        );
        assert_eq!(check(&request(13, None, None), &[], &[lunch.clone()]), SlotAvailability::Open);

        // 其他教师的封锁不影响
        let mut other = lunch;
        other.teacher_id = OTHER_TEACHER;
        assert_eq!(check(&request(12, None, None), &[], &[other]), SlotAvailability::Open);
    }

    #[test]
    fn test_block_checked_before_bookings() {
        let block = TeacherBlock {
            id: 1,
            teacher_id: TEACHER,
            block_type: BlockType::Single,
            start_time: local(9, 0),
            end_time: local(11, 0),
            recurrence_days: vec![],
            recurrence_until: None,
            reason: None,
            created_by: TEACHER,
            created_at: now(),
        };
        let bookings = [booking(TEACHER, 99, SessionType::Private, 10)];
        assert_eq!(
            reason(check(&request(10, None, None), &bookings, &[block])),
            Some(BlockReason::TeacherBlocked)
        );
    }

    #[test]
    fn test_customer_conflict_across_teachers() {
        let bookings = [booking(OTHER_TEACHER, CUSTOMER, SessionType::Group, 10)];
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Private), Some(CUSTOMER)), &bookings, &[])),
            Some(BlockReason::CustomerConflict)
        );
        // 未指定顾客时不检查
        assert_eq!(
            check(&request(10, Some(SessionType::Private), None), &bookings, &[]),
            SlotAvailability::Open
        );
    }

    #[test]
    fn test_private_session_blocks() {
        let bookings = [booking(TEACHER, 99, SessionType::Private, 10)];
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Group), None), &bookings, &[])),
            Some(BlockReason::PrivateSession)
        );
    }

    #[test]
    fn test_partial_and_full_capacity() {
        let one_duo = [booking(TEACHER, 98, SessionType::Duo, 10)];
        assert_eq!(
            check(&request(10, Some(SessionType::Duo), None), &one_duo, &[]),
            SlotAvailability::Partial {
                session_type: SessionType::Duo,
                booked: 1,
                capacity: 2
            }
        );

        let two_duo = [
            booking(TEACHER, 98, SessionType::Duo, 10),
            booking(TEACHER, 97, SessionType::Duo, 10),
        ];
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Duo), None), &two_duo, &[])),
            Some(BlockReason::Full)
        );

        let groups: Vec<SlotBooking> = (0..5)
            .map(|c| booking(TEACHER, 100 + c, SessionType::Group, 10))
            .collect();
        assert_eq!(
            check(&request(10, None, None), &groups, &[]),
            SlotAvailability::Partial {
                session_type: SessionType::Group,
                booked: 5,
                capacity: 6
            }
        );
    }

    #[test]
    fn test_type_mismatch_and_mixed() {
        let duo = [booking(TEACHER, 98, SessionType::Duo, 10)];
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Group), None), &duo, &[])),
            Some(BlockReason::SessionTypeMismatch)
        );
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Private), None), &duo, &[])),
            Some(BlockReason::SessionTypeMismatch)
        );

        let mixed = [
            booking(TEACHER, 98, SessionType::Duo, 10),
            booking(TEACHER, 97, SessionType::Group, 10),
        ];
        assert_eq!(
            reason(check(&request(10, Some(SessionType::Group), None), &mixed, &[])),
            Some(BlockReason::Full)
        );
    }

    #[test]
    fn test_ignores_inactive_and_adjacent_bookings() {
        let mut cancelled = booking(TEACHER, 98, SessionType::Private, 10);
        cancelled.status = BookingStatus::Cancelled;
        let adjacent = booking(TEACHER, 97, SessionType::Private, 11);
        let other_teacher = booking(OTHER_TEACHER, 96, SessionType::Private, 10);
        assert_eq!(
            check(
                &request(10, Some(SessionType::Private), Some(CUSTOMER)),
                &[cancelled, adjacent, other_teacher],
                &[]
            ),
            SlotAvailability::Open
        );
    }

    #[test]
    fn test_day_slots() {
        let slots = day_slots(date(), &rules());
        assert_eq!(slots.len(), 14);
        assert_eq!(slots[0].start, local(7, 0));
        assert_eq!(slots[13].end, local(21, 0));

        let mut half_hour = rules();
        half_hour.slot_step_minutes = 30;
        let slots = day_slots(date(), &half_hour);
        assert_eq!(slots.len(), 27);
        assert_eq!(slots[26].start, local(20, 0));
    }

    #[test]
    fn test_evaluate_day() {
        let bookings = [booking(TEACHER, 98, SessionType::Private, 9)];
        let day = evaluate_day(date(), TEACHER, None, None, &bookings, &[], &rules(), now());
        assert_eq!(day.len(), 14);
        assert_eq!(day[1].1, SlotAvailability::Open);
        assert_eq!(day[2].0.start, local(9, 0));
        assert_eq!(day[2].1.blocked_reason(), Some(BlockReason::PrivateSession));
        assert_eq!(day[3].1, SlotAvailability::Open);
    }

    #[test]
    fn test_serialized_shape() {
        let partial = SlotAvailability::Partial {
            session_type: SessionType::Group,
            booked: 2,
            capacity: 6,
        };
        let json = serde_json::to_value(partial).unwrap();
        assert_eq!(json["status"], "partial");
        assert_eq!(json["session_type"], "group");

        let blocked = SlotAvailability::Blocked {
            reason: BlockReason::TeacherBlocked,
        };
        let json = serde_json::to_value(blocked).unwrap();
        assert_eq!(json["status"], "blocked");
        assert_eq!(json["reason"], "teacher_blocked");
    }
}
