use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/customer.ts")]
pub struct CustomerListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/customer.ts")]
pub struct UpdateCustomerRequest {
    pub nickname: Option<String>,
    pub birth_date: Option<String>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
}
