use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::PackageService;
use crate::models::{
    ApiResponse, ErrorCode,
    packages::{
        entities::plan_adjustment,
        requests::AdjustPackageRequest,
        responses::{AdjustPackageResponse, PackageAdjustmentListResponse},
    },
};
use crate::services::{bad_request, current_user, not_found, storage_error_response};

/// 人工调整剩余课时或到期日，必须填写原因
pub async fn adjust_package(
    service: &PackageService,
    package_id: i64,
    body: AdjustPackageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    let package = match storage.get_package_by_id(package_id).await {
        Ok(Some(package)) => package,
        Ok(None) => return Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    };

    let plan = match plan_adjustment(
        &package,
        body.sessions_delta,
        body.expiry_date,
        body.reason.as_deref(),
        Utc::now(),
    ) {
        Ok(plan) => plan,
        Err(msg) => return Ok(bad_request(ErrorCode::PackageAdjustInvalid, msg)),
    };

    match storage.adjust_package(package_id, plan, me.id).await {
        Ok(Some((package, adjustment))) => {
            info!(
                "Package #{} adjusted by user {}: {} -> {} sessions, expiry {}",
                package.id,
                me.id,
                adjustment.remaining_before,
                adjustment.remaining_after,
                adjustment.expiry_after
            );
            service
                .notifier(storage.clone())
                .package_adjusted(&package, &adjustment)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AdjustPackageResponse {
                    package,
                    adjustment,
                },
                "Package adjusted",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
        Err(e) => Ok(storage_error_response(&e)),
    }
}

pub async fn list_adjustments(
    service: &PackageService,
    package_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_package_by_id(package_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    }

    match storage.list_package_adjustments(package_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PackageAdjustmentListResponse { items },
            "Adjustments retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(&e)),
    }
}
