use serde::Serialize;
use ts_rs::TS;

use super::entities::Customer;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::User;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/customer.ts")]
pub struct CustomerResponse {
    pub user: User,
    pub customer: Customer,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/customer.ts")]
pub struct CustomerListResponse {
    pub items: Vec<CustomerResponse>,
    pub pagination: PaginationInfo,
}
