//! 时段可用性判定
//!
//! 纯函数模块，不访问数据库。服务层先取出相关的预约与封锁，再交给这里判定。

pub mod availability;
pub mod recurrence;

pub use availability::{
    BlockReason, SlotAvailability, SlotBooking, SlotRequest, StudioRules, day_slots,
    evaluate_day, evaluate_slot,
};
pub use recurrence::{block_occurrences, validate_block};

use chrono::{DateTime, Duration, Utc};

/// 半开区间 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start,
            end: start + length,
        }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlaps(self, other)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// 首尾相接不算重叠
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    #[test]
    fn test_overlaps_half_open() {
        let a = TimeRange::new(at(9, 0), at(10, 0));
        assert!(overlaps(&a, &TimeRange::new(at(9, 30), at(10, 30))));
        assert!(overlaps(&a, &TimeRange::new(at(8, 0), at(11, 0))));
        assert!(!overlaps(&a, &TimeRange::new(at(10, 0), at(11, 0))));
        assert!(!overlaps(&a, &TimeRange::new(at(8, 0), at(9, 0))));
        assert!(TimeRange::new(at(9, 0), at(9, 0)).is_empty());
    }
}
