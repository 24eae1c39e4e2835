use serde::Serialize;
use ts_rs::TS;

use super::entities::PaymentReport;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/payment.ts")]
pub struct PaymentResponse {
    pub payment: PaymentReport,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/payment.ts")]
pub struct PaymentListResponse {
    pub items: Vec<PaymentReport>,
    pub pagination: PaginationInfo,
}
