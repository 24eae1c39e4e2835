use serde::Deserialize;
use ts_rs::TS;

use super::entities::PackageRequestStatus;
use crate::models::common::PaginationQuery;
use crate::models::packages::entities::SessionType;
use crate::models::payments::entities::PaymentMethod;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct SubmitPackageRequest {
    pub session_type: SessionType,
    pub total_sessions: i32,
    pub validity_days: i64,
    pub price: f64,
    pub payment_reference: Option<String>,
    pub note: Option<String>,
}

/// 审核（批准/拒绝）；拒绝时 review_note 必填
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct ReviewPackageRequest {
    pub review_note: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct PackageRequestListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PackageRequestStatus>,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PackageRequestListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<PackageRequestStatus>,
    pub customer_id: Option<i64>,
}
