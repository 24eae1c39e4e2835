use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};
use tracing::info;

use super::PackageService;
use crate::models::{
    ApiResponse, ErrorCode,
    packages::{
        requests::{CreatePackageRequest, NewPackage, validate_package_terms},
        responses::PackageResponse,
    },
    payments::{entities::PaymentMethod, requests::NewPayment},
};
use crate::services::{bad_request, current_user, not_found, storage_error_response};

/// 管理员直接售出课程包；价格大于 0 时同时记一笔流水
pub async fn create_package(
    service: &PackageService,
    body: CreatePackageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(msg) = validate_package_terms(body.total_sessions, body.validity_days, body.price) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    match storage.get_customer(body.customer_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
        Err(e) => return Ok(storage_error_response(&e)),
    }

    let now = Utc::now();
    let start_date = body.start_date.unwrap_or(now);
    let new_package = NewPackage {
        customer_id: body.customer_id,
        session_type: body.session_type,
        total_sessions: body.total_sessions,
        price: body.price,
        start_date,
        expiry_date: start_date + Duration::days(body.validity_days),
        source_request_id: None,
    };
    let payment = (body.price > 0.0).then(|| NewPayment {
        customer_id: body.customer_id,
        package_id: None,
        session_type: Some(body.session_type),
        amount: body.price,
        method: body.payment_method.unwrap_or(PaymentMethod::Cash),
        reference: body.payment_reference,
        recorded_by: me.id,
        paid_at: now,
        note: None,
    });

    match storage.create_package(new_package, payment).await {
        Ok((package, payment)) => {
            info!(
                "Package #{} ({} x {}) sold to customer {}{}",
                package.id,
                package.total_sessions,
                package.session_type,
                package.customer_id,
                payment
                    .map(|p| format!(", payment #{}", p.id))
                    .unwrap_or_default()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PackageResponse { package },
                "Package created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response(&e)),
    }
}
