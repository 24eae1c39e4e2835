//! 财务与教师报表（管理员）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{app_component, bad_request, current_user, not_found, storage_error_response};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::bookings::entities::{Booking, BookingStatus};
use crate::models::payments::requests::{
    NewPayment, PaymentListParams, PaymentListQuery, RecordPaymentRequest,
};
use crate::models::payments::responses::PaymentResponse;
use crate::models::reports::entities::{
    FinanceReport, SessionCounts, TeacherReport, TeacherReportRow, summarize_revenue,
};
use crate::models::reports::requests::ReportRangeQuery;
use crate::models::teachers::requests::TeacherListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::time::from_timestamp;

/// 未指定结束时间时统计到十年之后
const OPEN_END_DAYS: i64 = 3650;

fn resolve_range(query: &ReportRangeQuery, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        query.from.unwrap_or_else(|| from_timestamp(0)),
        query.to.unwrap_or_else(|| now + Duration::days(OPEN_END_DAYS)),
    )
}

fn invalid_range(query: &ReportRangeQuery) -> bool {
    matches!((query.from, query.to), (Some(from), Some(to)) if from >= to)
}

/// 按教师汇总课程数；没有课程的教师也会出现
pub fn teacher_rows(
    teachers: &[(i64, String)],
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> Vec<TeacherReportRow> {
    let mut rows: HashMap<i64, TeacherReportRow> = teachers
        .iter()
        .map(|(id, name)| {
            (
                *id,
                TeacherReportRow {
                    teacher_id: *id,
                    teacher_name: name.clone(),
                    ..Default::default()
                },
            )
        })
        .collect();

    for booking in bookings {
        let row = rows
            .entry(booking.teacher_id)
            .or_insert_with(|| TeacherReportRow {
                teacher_id: booking.teacher_id,
                teacher_name: format!("#{}", booking.teacher_id),
                ..Default::default()
            });
        match booking.status {
            BookingStatus::Completed => row.completed += 1,
            BookingStatus::Cancelled => row.cancelled += 1,
            BookingStatus::Pending | BookingStatus::Confirmed if booking.start_time > now => {
                row.upcoming += 1
            }
            _ => {}
        }
    }

    let mut rows: Vec<TeacherReportRow> = rows.into_values().collect();
    rows.sort_by(|a, b| {
        b.completed
            .cmp(&a.completed)
            .then_with(|| a.teacher_id.cmp(&b.teacher_id))
    });
    rows
}

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    async fn build_finance(
        storage: &dyn Storage,
        query: &ReportRangeQuery,
        now: DateTime<Utc>,
    ) -> Result<FinanceReport> {
        let offset = AppConfig::get().studio_offset();
        let payments = storage.list_payments_in_range(query.from, query.to).await?;
        let revenue = summarize_revenue(&payments, offset);
        let packages_sold = storage.count_packages_created(query.from, query.to).await?;

        let (from, to) = resolve_range(query, now);
        let mut sessions = SessionCounts::default();
        for booking in storage
            .list_bookings_in_range(None, None, from, to, false)
            .await?
        {
            sessions.record(booking.status);
        }
        let outstanding_sessions = storage.count_outstanding_sessions().await?;

        Ok(FinanceReport {
            from: query.from,
            to: query.to,
            revenue_total: revenue.total,
            revenue_by_session_type: revenue.by_session_type,
            revenue_by_month: revenue.by_month,
            payment_count: payments.len() as i64,
            packages_sold,
            sessions,
            outstanding_sessions,
        })
    }

    pub async fn finance(
        &self,
        query: ReportRangeQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if invalid_range(&query) {
            return Ok(bad_request(ErrorCode::BadRequest, "from must be before to"));
        }
        let storage = self.get_storage(request)?;
        match Self::build_finance(storage.as_ref(), &query, Utc::now()).await {
            Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                report,
                "Finance report generated",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn list_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let list_query = PaymentListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            customer_id: query.customer_id,
            from: query.from,
            to: query.to,
        };
        match storage.list_payments_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Payments retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 手工记一笔流水；关联课程包时须属于同一顾客
    pub async fn record_payment(
        &self,
        body: RecordPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        if !body.amount.is_finite() || body.amount <= 0.0 {
            return Ok(bad_request(ErrorCode::BadRequest, "Amount must be positive"));
        }

        let storage = self.get_storage(request)?;
        match storage.get_customer(body.customer_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
            Err(e) => return Ok(storage_error_response(&e)),
        }
        let session_type = match body.package_id {
            Some(package_id) => match storage.get_package_by_id(package_id).await {
                Ok(Some(package)) if package.customer_id == body.customer_id => {
                    Some(package.session_type)
                }
                Ok(Some(_)) => {
                    return Ok(bad_request(
                        ErrorCode::BadRequest,
                        "Package belongs to another customer",
                    ));
                }
                Ok(None) => {
                    return Ok(not_found(ErrorCode::PackageNotFound, "Package not found"));
                }
                Err(e) => return Ok(storage_error_response(&e)),
            },
            None => None,
        };

        let payment = NewPayment {
            customer_id: body.customer_id,
            package_id: body.package_id,
            session_type,
            amount: body.amount,
            method: body.method,
            reference: body.reference,
            recorded_by: me.id,
            paid_at: body.paid_at.unwrap_or_else(Utc::now),
            note: body.note,
        };
        match storage.create_payment(payment).await {
            Ok(payment) => {
                info!(
                    "Payment #{} of {:.2} recorded for customer {}",
                    payment.id, payment.amount, payment.customer_id
                );
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    PaymentResponse { payment },
                    "Payment recorded",
                )))
            }
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn teachers(
        &self,
        query: ReportRangeQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if invalid_range(&query) {
            return Ok(bad_request(ErrorCode::BadRequest, "from must be before to"));
        }
        let storage = self.get_storage(request)?;
        let now = Utc::now();
        let (from, to) = resolve_range(&query, now);

        let teachers = match storage
            .list_teachers_with_pagination(TeacherListQuery {
                page: Some(1),
                size: Some(100),
                active_only: false,
            })
            .await
        {
            Ok(list) => list
                .items
                .into_iter()
                .map(|t| (t.user.id, t.user.name().to_string()))
                .collect::<Vec<_>>(),
            Err(e) => return Ok(storage_error_response(&e)),
        };
        let bookings = match storage
            .list_bookings_in_range(None, None, from, to, false)
            .await
        {
            Ok(bookings) => bookings,
            Err(e) => return Ok(storage_error_response(&e)),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherReport {
                from: query.from,
                to: query.to,
                items: teacher_rows(&teachers, &bookings, now),
            },
            "Teacher report generated",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::packages::entities::SessionType;
    use chrono::TimeZone;

    fn booking(teacher_id: i64, status: BookingStatus, start: DateTime<Utc>) -> Booking {
        Booking {
            id: 0,
            customer_id: 1,
            teacher_id,
            package_id: None,
            session_type: SessionType::Group,
            start_time: start,
            end_time: start + Duration::hours(1),
            status,
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
    fn test_teacher_rows() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let past = now - Duration::days(1);
        let future = now + Duration::days(1);
        let teachers = vec![(20, "Mai".to_string()), (21, "Ploy".to_string())];
        let bookings = vec![
            booking(20, BookingStatus::Completed, past),
            booking(20, BookingStatus::Completed, past),
            booking(20, BookingStatus::Cancelled, future),
            booking(20, BookingStatus::Confirmed, future),
            // 已过开始时间但未完成，不计入 upcoming
            booking(20, BookingStatus::Confirmed, past),
            booking(22, BookingStatus::Pending, future),
        ];

        let rows = teacher_rows(&teachers, &bookings, now);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].teacher_id, 20);
        assert_eq!((rows[0].completed, rows[0].cancelled, rows[0].upcoming), (2, 1, 1));
        assert_eq!(rows[1].teacher_id, 21);
        assert_eq!(rows[1].upcoming, 0);
        assert_eq!(rows[2].teacher_name, "#22");
    }

    #[test]
    fn test_resolve_range_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let (from, to) = resolve_range(&ReportRangeQuery { from: None, to: None }, now);
        assert_eq!(from.timestamp(), 0);
        assert_eq!(to, now + Duration::days(OPEN_END_DAYS));
        assert!(invalid_range(&ReportRangeQuery { from: Some(now), to: Some(now) }));
        assert!(!invalid_range(&ReportRangeQuery { from: Some(now), to: None }));
    }
}
