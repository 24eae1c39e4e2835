use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::packages::entities::SessionType;

define_string_enum! {
    /// 购买申请状态
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
    pub enum PackageRequestStatus("购买申请状态") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

/// 顾客提交的课程包购买申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct PackageRequest {
    pub id: i64,
    pub customer_id: i64,
    pub session_type: SessionType,
    pub total_sessions: i32,
    pub validity_days: i64,
    pub price: f64,
    pub payment_reference: Option<String>,
    pub note: Option<String>,
    pub status: PackageRequestStatus,
    pub reviewed_by: Option<i64>,
    pub review_note: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub package_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
