use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};

use super::TimeRange;
use crate::models::bookings::entities::{BlockType, TeacherBlock};
use crate::utils::time::{local_date, local_time, local_to_utc};

/// 单次或多日封锁最长跨度
const MAX_BLOCK_DAYS: i64 = 366;

/// 将封锁展开为与窗口相交的具体时间段
///
/// 周期封锁按本地日期逐日展开，从 `start_time` 所在日期到 `recurrence_until` 所在日期（含），
/// 每天取 `start_time`/`end_time` 的本地时刻。
pub fn block_occurrences(
    block: &TeacherBlock,
    window: &TimeRange,
    offset: FixedOffset,
) -> Vec<TimeRange> {
    match block.block_type {
        BlockType::Single | BlockType::MultiDay => {
            let range = TimeRange::new(block.start_time, block.end_time);
            if range.overlaps(window) {
                vec![range]
            } else {
                Vec::new()
            }
        }
        BlockType::Recurring => recurring_occurrences(block, window, offset),
    }
}

fn recurring_occurrences(
    block: &TeacherBlock,
    window: &TimeRange,
    offset: FixedOffset,
) -> Vec<TimeRange> {
    if window.is_empty() || block.recurrence_days.is_empty() {
        return Vec::new();
    }

    let from_time = local_time(block.start_time, offset);
    let to_time = local_time(block.end_time, offset);
    // 跨午夜的时段顺延到次日结束
    let spill = if to_time <= from_time { 1 } else { 0 };

    let first_day = local_date(block.start_time, offset);
    // 前一天的时段可能延续到窗口内
    let mut day = (local_date(window.start, offset) - Duration::days(1)).max(first_day);
    let mut last_day = local_date(window.end, offset);
    if let Some(until) = block.recurrence_until {
        last_day = last_day.min(local_date(until, offset));
    }

    let mut ranges = Vec::new();
    while day <= last_day {
        let weekday = day.weekday().num_days_from_monday() as u8;
        if block.recurrence_days.contains(&weekday) {
            let start = local_to_utc(day, from_time, offset);
            let end = local_to_utc(day + Duration::days(spill), to_time, offset);
            let range = TimeRange::new(start, end);
            if range.overlaps(window) {
                ranges.push(range);
            }
        }
        day += Duration::days(1);
    }
    ranges
}

/// 校验新建封锁的形状
pub fn validate_block(
    block_type: BlockType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    recurrence_days: &[u8],
    recurrence_until: Option<DateTime<Utc>>,
    offset: FixedOffset,
) -> Result<(), &'static str> {
    if end <= start {
        return Err("End time must be after start time");
    }
    if end - start > Duration::days(MAX_BLOCK_DAYS) {
        return Err("Block cannot span more than a year");
    }

    // 以结束前一秒判断日期，允许恰好结束在午夜
    let same_local_day =
        local_date(start, offset) == local_date(end - Duration::seconds(1), offset);

    match block_type {
        BlockType::Single => {
            if !same_local_day {
                return Err("Single block must start and end on the same day");
            }
        }
        BlockType::MultiDay => {}
        BlockType::Recurring => {
            if recurrence_days.is_empty() {
                return Err("Recurring block needs at least one weekday");
            }
            if recurrence_days.iter().any(|d| *d > 6) {
                return Err("Weekday must be between 0 (Monday) and 6 (Sunday)");
            }
            if !same_local_day {
                return Err("Recurring block start and end must be on the same day");
            }
            if recurrence_until.is_some_and(|until| until < start) {
                return Err("Recurrence end must not be before the block start");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::studio_offset;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn offset() -> FixedOffset {
        studio_offset(420)
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        local_to_utc(
            NaiveDate::from_ymd_opt(y, mo, d).unwrap(),
            NaiveTime::from_hms_opt(h, mi, 0).unwrap(),
            offset(),
        )
    }

    fn block(
        block_type: BlockType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        days: Vec<u8>,
        until: Option<DateTime<Utc>>,
    ) -> TeacherBlock {
        TeacherBlock {
            id: 1,
            teacher_id: 7,
            block_type,
            start_time: start,
            end_time: end,
            recurrence_days: days,
            recurrence_until: until,
            reason: None,
            created_by: 7,
            created_at: start,
        }
    }

    #[test]
    fn test_single_block_occurrence() {
        let b = block(
            BlockType::Single,
            local(2025, 6, 2, 12, 0),
            local(2025, 6, 2, 13, 0),
            vec![],
            None,
        );
        let inside = TimeRange::new(local(2025, 6, 2, 12, 30), local(2025, 6, 2, 13, 30));
        let after = TimeRange::new(local(2025, 6, 2, 13, 0), local(2025, 6, 2, 14, 0));
        assert_eq!(block_occurrences(&b, &inside, offset()).len(), 1);
        assert!(block_occurrences(&b, &after, offset()).is_empty());
    }

    #[test]
    fn test_multi_day_is_continuous() {
        let b = block(
            BlockType::MultiDay,
            local(2025, 6, 2, 9, 0),
            local(2025, 6, 5, 18, 0),
            vec![],
            None,
        );
        // 中间一天的深夜同样被封锁
        let night = TimeRange::new(local(2025, 6, 3, 23, 0), local(2025, 6, 4, 0, 0));
        assert_eq!(block_occurrences(&b, &night, offset()).len(), 1);
    }

    #[test]
    fn test_recurring_weekdays_in_local_time() {
        // 2025-06-02 是周一；每周一、三 08:00-10:00（UTC+7）
        let b = block(
            BlockType::Recurring,
            local(2025, 6, 2, 8, 0),
            local(2025, 6, 2, 10, 0),
            vec![0, 2],
            Some(local(2025, 6, 30, 0, 0)),
        );
        let week = TimeRange::new(local(2025, 6, 9, 0, 0), local(2025, 6, 16, 0, 0));
        let hits = block_occurrences(&b, &week, offset());
        assert_eq!(
            hits,
            vec![
                TimeRange::new(local(2025, 6, 9, 8, 0), local(2025, 6, 9, 10, 0)),
                TimeRange::new(local(2025, 6, 11, 8, 0), local(2025, 6, 11, 10, 0)),
            ]
        );
        // 周一 08:00 本地 = 周一 01:00 UTC
        assert_eq!(hits[0].start, Utc.with_ymd_and_hms(2025, 6, 9, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_recurring_respects_start_and_until() {
        let b = block(
            BlockType::Recurring,
            local(2025, 6, 4, 8, 0),
            local(2025, 6, 4, 10, 0),
            vec![0],
            Some(local(2025, 6, 16, 0, 0)),
        );
        // 6/2 周一早于起始日，6/23 周一晚于截止日
        let before = TimeRange::new(local(2025, 6, 2, 0, 0), local(2025, 6, 3, 0, 0));
        let last = TimeRange::new(local(2025, 6, 16, 0, 0), local(2025, 6, 17, 0, 0));
        let after = TimeRange::new(local(2025, 6, 23, 0, 0), local(2025, 6, 24, 0, 0));
        assert!(block_occurrences(&b, &before, offset()).is_empty());
        assert_eq!(block_occurrences(&b, &last, offset()).len(), 1);
        assert!(block_occurrences(&b, &after, offset()).is_empty());
    }

    #[test]
    fn test_recurring_without_until_is_unbounded() {
        let b = block(
            BlockType::Recurring,
            local(2025, 1, 6, 12, 0),
            local(2025, 1, 6, 13, 0),
            vec![0],
            None,
        );
        let far = TimeRange::new(local(2026, 6, 1, 12, 30), local(2026, 6, 1, 13, 30));
        assert_eq!(block_occurrences(&b, &far, offset()).len(), 1);
    }

    #[test]
    fn test_validate_block() {
        let o = offset();
        let s = local(2025, 6, 2, 8, 0);
        let e = local(2025, 6, 2, 10, 0);
        assert!(validate_block(BlockType::Single, s, e, &[], None, o).is_ok());
        assert!(validate_block(BlockType::Single, e, s, &[], None, o).is_err());
        assert!(
            validate_block(BlockType::Single, s, local(2025, 6, 3, 9, 0), &[], None, o).is_err()
        );
        assert!(
            validate_block(BlockType::Single, s, local(2025, 6, 3, 0, 0), &[], None, o).is_ok()
        );
        assert!(
            validate_block(BlockType::MultiDay, s, local(2025, 6, 6, 9, 0), &[], None, o).is_ok()
        );
        assert!(validate_block(BlockType::Recurring, s, e, &[], None, o).is_err());
        assert!(validate_block(BlockType::Recurring, s, e, &[7], None, o).is_err());
        assert!(validate_block(BlockType::Recurring, s, e, &[0, 6], None, o).is_ok());
        assert!(
            validate_block(
                BlockType::Recurring,
                s,
                e,
                &[1],
                Some(local(2025, 6, 1, 0, 0)),
                o
            )
            .is_err()
        );
    }
}
