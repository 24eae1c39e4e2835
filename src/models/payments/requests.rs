use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentMethod;
use crate::models::common::PaginationQuery;
use crate::models::packages::entities::SessionType;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/payment.ts")]
pub struct RecordPaymentRequest {
    pub customer_id: i64,
    pub package_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    /// 默认为当前时间
    pub paid_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub customer_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub customer_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 存储层新建流水
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: i64,
    pub package_id: Option<i64>,
    pub session_type: Option<SessionType>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub recorded_by: i64,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}
