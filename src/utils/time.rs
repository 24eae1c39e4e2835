//! 时间工具
//!
//! 数据库统一存储 UTC 秒级时间戳，营业时间、日历日期等按工作室本地偏移计算。

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

/// 根据分钟偏移构造时区，非法值回退到 UTC
pub fn studio_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// 时间戳转 UTC 时间
pub fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// UTC 时间对应的本地日期
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// UTC 时间对应的本地时刻
pub fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> NaiveTime {
    at.with_timezone(&offset).time()
}

/// 本地日期 + 本地时刻 转 UTC
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    // 固定偏移不存在夏令时歧义，single() 总能取到值
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(time)))
}

/// 本地日期零点（UTC）
pub fn local_day_start(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    local_to_utc(date, NaiveTime::MIN, offset)
}

/// 按本地时间计算的月份键，例如 "2025-03"
pub fn month_key(at: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!("{:04}-{:02}", local.year(), local.month())
}

/// 解析 YYYY-MM-DD
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}

/// 格式化为本地可读时间，用于消息模板
pub fn format_local(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bangkok() -> FixedOffset {
        studio_offset(420)
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 2025-03-01 18:30 UTC = 2025-03-02 01:30 本地
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap();
        assert_eq!(
            local_date(at, bangkok()),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_local_to_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            local_to_utc(date, time, bangkok()),
            Utc.with_ymd_and_hms(2025, 3, 2, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_key_uses_local_offset() {
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 20, 0, 0).unwrap();
        assert_eq!(month_key(at, bangkok()), "2025-02");
        assert_eq!(month_key(at, studio_offset(0)), "2025-01");
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        assert_eq!(studio_offset(100_000).local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-02-28").is_ok());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("28/02/2025").is_err());
    }
}
