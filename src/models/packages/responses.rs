use serde::Serialize;
use ts_rs::TS;

use super::entities::{Package, PackageAdjustment};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct PackageResponse {
    pub package: Package,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct PackageListResponse {
    pub items: Vec<Package>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct PackageAdjustmentListResponse {
    pub items: Vec<PackageAdjustment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct AdjustPackageResponse {
    pub package: Package,
    pub adjustment: PackageAdjustment,
}
