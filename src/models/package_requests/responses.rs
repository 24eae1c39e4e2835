use serde::Serialize;
use ts_rs::TS;

use super::entities::PackageRequest;
use crate::models::common::PaginationInfo;
use crate::models::packages::entities::Package;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct PackageRequestResponse {
    pub request: PackageRequest,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct PackageRequestListResponse {
    pub items: Vec<PackageRequest>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package_request.ts")]
pub struct ApprovePackageRequestResponse {
    pub request: PackageRequest,
    pub package: Package,
}
