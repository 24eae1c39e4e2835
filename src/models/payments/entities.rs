use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::packages::entities::SessionType;

define_string_enum! {
    /// 付款方式
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/payment.ts")]
    pub enum PaymentMethod("付款方式") {
        Transfer => "transfer",
        Cash => "cash",
        Card => "card",
        Other => "other",
    }
}

/// 财务流水
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/payment.ts")]
pub struct PaymentReport {
    pub id: i64,
    pub customer_id: i64,
    pub package_id: Option<i64>,
    /// 关联课程包的类型，用于按类型统计
    pub session_type: Option<SessionType>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub recorded_by: i64,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
