use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::utils::validate::validate_reason;

define_string_enum! {
    /// 课程类型
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/package.ts")]
    pub enum SessionType("课程类型") {
        Private => "private",
        Duo => "duo",
        Group => "group",
    }
}

impl SessionType {
    /// 同一时段同一教师可容纳的人数
    pub fn capacity(&self, duo_capacity: u32, group_capacity: u32) -> u32 {
        match self {
            SessionType::Private => 1,
            SessionType::Duo => duo_capacity.max(1),
            SessionType::Group => group_capacity.max(1),
        }
    }
}

define_string_enum! {
    /// 课程包状态
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/package.ts")]
    pub enum PackageStatus("课程包状态") {
        Active => "active",
        Expired => "expired",
        Used => "used",
    }
}

/// 顾客已购买的课程包
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct Package {
    pub id: i64,
    pub customer_id: i64,
    pub session_type: SessionType,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub price: f64,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: PackageStatus,
    pub source_request_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Package {
    /// 根据剩余次数与有效期推导状态
    pub fn derive_status(remaining: i32, expiry: DateTime<Utc>, now: DateTime<Utc>) -> PackageStatus {
        if remaining <= 0 {
            PackageStatus::Used
        } else if expiry < now {
            PackageStatus::Expired
        } else {
            PackageStatus::Active
        }
    }

    /// 该课程包能否用于指定类型、指定开始时间的课程
    pub fn covers(&self, session_type: SessionType, session_start: DateTime<Utc>) -> bool {
        self.status == PackageStatus::Active
            && self.session_type == session_type
            && self.remaining_sessions > 0
            && self.start_date <= session_start
            && session_start < self.expiry_date
    }

    /// 从候选中挑选最早到期且可用的课程包
    pub fn pick_for_session(
        packages: &[Package],
        session_type: SessionType,
        session_start: DateTime<Utc>,
    ) -> Option<&Package> {
        packages
            .iter()
            .filter(|p| p.covers(session_type, session_start))
            .min_by_key(|p| (p.expiry_date, p.id))
    }
}

/// 人工调整课程包的记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct PackageAdjustment {
    pub id: i64,
    pub package_id: i64,
    pub sessions_delta: i32,
    pub remaining_before: i32,
    pub remaining_after: i32,
    pub expiry_before: DateTime<Utc>,
    pub expiry_after: DateTime<Utc>,
    pub reason: String,
    pub adjusted_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 校验通过后的调整方案
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentPlan {
    pub sessions_delta: i32,
    pub remaining_after: i32,
    pub expiry_after: DateTime<Utc>,
    pub status_after: PackageStatus,
    pub reason: String,
}

/// 校验人工调整请求
///
/// 必须填写原因；剩余次数保持在 `0..=total_sessions`；新到期日需晚于开始日期。
pub fn plan_adjustment(
    package: &Package,
    sessions_delta: Option<i32>,
    new_expiry: Option<DateTime<Utc>>,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<AdjustmentPlan, &'static str> {
    let reason = validate_reason(reason)?;
    let delta = sessions_delta.unwrap_or(0);

    if delta == 0 && new_expiry.is_none() {
        return Err("Nothing to adjust: provide sessions_delta or expiry_date");
    }

    let remaining_after = package
        .remaining_sessions
        .checked_add(delta)
        .ok_or("Session delta is out of range")?;
    if remaining_after < 0 {
        return Err("Remaining sessions cannot be negative");
    }
    if remaining_after > package.total_sessions {
        return Err("Remaining sessions cannot exceed total sessions");
    }

    let expiry_after = new_expiry.unwrap_or(package.expiry_date);
    if expiry_after <= package.start_date {
        return Err("Expiry date must be after the package start date");
    }

    Ok(AdjustmentPlan {
        sessions_delta: delta,
        remaining_after,
        expiry_after,
        status_after: Package::derive_status(remaining_after, expiry_after, now),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 3, 0, 0).unwrap()
    }

    fn package(remaining: i32, total: i32) -> Package {
        Package {
            id: 1,
            customer_id: 10,
            session_type: SessionType::Private,
            total_sessions: total,
            remaining_sessions: remaining,
            price: 8000.0,
            start_date: now() - Duration::days(10),
            expiry_date: now() + Duration::days(20),
            status: Package::derive_status(remaining, now() + Duration::days(20), now()),
            source_request_id: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_capacity() {
        assert_eq!(SessionType::Private.capacity(2, 6), 1);
        assert_eq!(SessionType::Duo.capacity(2, 6), 2);
        assert_eq!(SessionType::Group.capacity(2, 6), 6);
        assert_eq!(SessionType::Group.capacity(2, 0), 1);
    }

    #[test]
    fn test_derive_status() {
        let future = now() + Duration::days(1);
        let past = now() - Duration::days(1);
        assert_eq!(Package::derive_status(3, future, now()), PackageStatus::Active);
        assert_eq!(Package::derive_status(3, past, now()), PackageStatus::Expired);
        assert_eq!(Package::derive_status(0, future, now()), PackageStatus::Used);
    }

    #[test]
    fn test_adjust_requires_reason() {
        let p = package(5, 10);
        assert_eq!(
            plan_adjustment(&p, Some(1), None, None, now()),
            Err("Reason is required")
        );
        assert_eq!(
            plan_adjustment(&p, Some(1), None, Some("  "), now()),
            Err("Reason is required")
        );
    }

    #[test]
    fn test_adjust_bounds() {
        let p = package(5, 10);
        assert!(plan_adjustment(&p, Some(-6), None, Some("fix"), now()).is_err());
        assert!(plan_adjustment(&p, Some(6), None, Some("fix"), now()).is_err());
        assert!(plan_adjustment(&p, Some(0), None, Some("fix"), now()).is_err());

        let plan = plan_adjustment(&p, Some(-5), None, Some("no-show"), now()).unwrap();
        assert_eq!(plan.remaining_after, 0);
        assert_eq!(plan.status_after, PackageStatus::Used);
    }

    #[test]
    fn test_adjust_extends_expired_package() {
        let mut p = package(4, 10);
        p.expiry_date = now() - Duration::days(1);
        p.status = PackageStatus::Expired;
        let plan = plan_adjustment(
            &p,
            None,
            Some(now() + Duration::days(30)),
            Some("studio closed for renovation"),
            now(),
        )
        .unwrap();
        assert_eq!(plan.status_after, PackageStatus::Active);
        assert_eq!(plan.remaining_after, 4);
    }

    #[test]
    fn test_adjust_rejects_expiry_before_start() {
        let p = package(4, 10);
        let too_early = p.start_date - Duration::days(1);
        assert!(plan_adjustment(&p, None, Some(too_early), Some("typo"), now()).is_err());
    }

    #[test]
    fn test_pick_for_session_prefers_soonest_expiry() {
        let start = now() + Duration::days(2);
        let mut a = package(3, 10);
        a.id = 1;
        a.expiry_date = now() + Duration::days(40);
        let mut b = package(3, 10);
        b.id = 2;
        b.expiry_date = now() + Duration::days(5);
        let mut c = package(3, 10);
        c.id = 3;
        c.session_type = SessionType::Group;
        c.expiry_date = now() + Duration::days(3);
        let mut d = package(3, 10);
        d.id = 4;
        // 到期日早于课程开始，不可用
        d.expiry_date = now() + Duration::days(1);

        let all = vec![a, b, c, d];
        let picked = Package::pick_for_session(&all, SessionType::Private, start).unwrap();
        assert_eq!(picked.id, 2);
        assert!(Package::pick_for_session(&all, SessionType::Duo, start).is_none());
    }
}
