use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{PackageStatus, SessionType};
use crate::models::common::PaginationQuery;
use crate::models::payments::entities::PaymentMethod;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct PackageListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub customer_id: Option<i64>,
    pub status: Option<PackageStatus>,
    pub session_type: Option<SessionType>,
}

// 课程包列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct PackageListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub customer_id: Option<i64>,
    pub status: Option<PackageStatus>,
    pub session_type: Option<SessionType>,
}

/// 管理员直接售卖课程包
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct CreatePackageRequest {
    pub customer_id: i64,
    pub session_type: SessionType,
    pub total_sessions: i32,
    pub validity_days: i64,
    pub price: f64,
    /// 默认为当前时间
    pub start_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
}

/// 人工调整：剩余次数增减和/或修改到期日，必须填写原因
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/package.ts")]
pub struct AdjustPackageRequest {
    pub sessions_delta: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

/// 存储层新建课程包
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub customer_id: i64,
    pub session_type: SessionType,
    pub total_sessions: i32,
    pub price: f64,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub source_request_id: Option<i64>,
}

/// 校验课程包规格（次数、有效天数、价格）
pub fn validate_package_terms(
    total_sessions: i32,
    validity_days: i64,
    price: f64,
) -> Result<(), &'static str> {
    if !(1..=500).contains(&total_sessions) {
        return Err("Total sessions must be between 1 and 500");
    }
    if !(1..=3650).contains(&validity_days) {
        return Err("Validity days must be between 1 and 3650");
    }
    if !price.is_finite() || price < 0.0 {
        return Err("Price must be a non-negative number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_package_terms() {
        assert!(validate_package_terms(10, 90, 12000.0).is_ok());
        assert!(validate_package_terms(0, 90, 12000.0).is_err());
        assert!(validate_package_terms(10, 0, 12000.0).is_err());
        assert!(validate_package_terms(10, 90, -1.0).is_err());
        assert!(validate_package_terms(10, 90, f64::NAN).is_err());
    }
}
