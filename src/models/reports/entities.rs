use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::bookings::entities::BookingStatus;
use crate::models::packages::entities::SessionType;
use crate::models::payments::entities::PaymentReport;
use crate::utils::time::month_key;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct RevenueBySessionType {
    /// 未关联课程包的流水归入 `None`
    pub session_type: Option<SessionType>,
    pub amount: f64,
    pub payments: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct RevenueByMonth {
    /// YYYY-MM（工作室时区）
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct SessionCounts {
    pub booked: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl SessionCounts {
    pub fn record(&mut self, status: BookingStatus) {
        self.booked += 1;
        match status {
            BookingStatus::Completed => self.completed += 1,
            BookingStatus::Cancelled => self.cancelled += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct FinanceReport {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub revenue_total: f64,
    pub revenue_by_session_type: Vec<RevenueBySessionType>,
    pub revenue_by_month: Vec<RevenueByMonth>,
    pub payment_count: i64,
    pub packages_sold: i64,
    pub sessions: SessionCounts,
    /// 有效课程包中尚未使用的课时数
    pub outstanding_sessions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct TeacherReportRow {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub completed: i64,
    pub cancelled: i64,
    pub upcoming: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct TeacherReport {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub items: Vec<TeacherReportRow>,
}

/// 流水汇总：总额、按课程类型、按月份
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    pub total: f64,
    pub by_session_type: Vec<RevenueBySessionType>,
    pub by_month: Vec<RevenueByMonth>,
}

pub fn summarize_revenue(payments: &[PaymentReport], offset: FixedOffset) -> RevenueSummary {
    let mut total = 0.0;
    let mut by_type: Vec<RevenueBySessionType> = Vec::new();
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();

    for payment in payments {
        total += payment.amount;

        match by_type
            .iter_mut()
            .find(|row| row.session_type == payment.session_type)
        {
            Some(row) => {
                row.amount += payment.amount;
                row.payments += 1;
            }
            None => by_type.push(RevenueBySessionType {
                session_type: payment.session_type,
                amount: payment.amount,
                payments: 1,
            }),
        }

        *by_month
            .entry(month_key(payment.paid_at, offset))
            .or_insert(0.0) += payment.amount;
    }

    by_type.sort_by_key(|row| {
        row.session_type
            .and_then(|t| SessionType::ALL.iter().position(|s| *s == t))
            .unwrap_or(usize::MAX)
    });

    RevenueSummary {
        total,
        by_session_type: by_type,
        by_month: by_month
            .into_iter()
            .map(|(month, amount)| RevenueByMonth { month, amount })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::entities::PaymentMethod;
    use crate::utils::time::studio_offset;
    use chrono::TimeZone;

    fn payment(amount: f64, session_type: Option<SessionType>, paid_at: DateTime<Utc>) -> PaymentReport {
        PaymentReport {
            id: 0,
            customer_id: 1,
            package_id: None,
            session_type,
            amount,
            method: PaymentMethod::Transfer,
            reference: None,
            recorded_by: 1,
            paid_at,
            note: None,
            created_at: paid_at,
        }
    }

    #[test]
    fn test_summarize_revenue() {
        let offset = studio_offset(420);
        // 2025-01-31 18:00 UTC 在 UTC+7 已是 2 月 1 日
        let late_january_utc = Utc.with_ymd_and_hms(2025, 1, 31, 18, 0, 0).unwrap();
        let mid_january = Utc.with_ymd_and_hms(2025, 1, 15, 3, 0, 0).unwrap();

        let payments = vec![
            payment(3000.0, Some(SessionType::Group), mid_january),
            payment(8000.0, Some(SessionType::Private), late_january_utc),
            payment(2000.0, Some(SessionType::Private), mid_january),
            payment(500.0, None, mid_january),
        ];
        let summary = summarize_revenue(&payments, offset);

        assert_eq!(summary.total, 13500.0);
        assert_eq!(
            summary.by_month,
            vec![
                RevenueByMonth { month: "2025-01".into(), amount: 5500.0 },
                RevenueByMonth { month: "2025-02".into(), amount: 8000.0 },
            ]
        );
        assert_eq!(summary.by_session_type[0].session_type, Some(SessionType::Private));
        assert_eq!(summary.by_session_type[0].amount, 10000.0);
        assert_eq!(summary.by_session_type[0].payments, 2);
        assert_eq!(summary.by_session_type[1].session_type, Some(SessionType::Group));
        assert_eq!(summary.by_session_type[2].session_type, None);
    }

    #[test]
    fn test_session_counts() {
        let mut counts = SessionCounts::default();
        counts.record(BookingStatus::Completed);
        counts.record(BookingStatus::Cancelled);
        counts.record(BookingStatus::Confirmed);
        assert_eq!(
            counts,
            SessionCounts { booked: 3, completed: 1, cancelled: 1 }
        );
    }
}
