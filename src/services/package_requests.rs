//! 课程包购买申请：顾客提交，管理员审核

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{
    Notifier, app_component, bad_request, current_user, forbidden, not_found,
    storage_error_response,
};
use crate::config::AppConfig;
use crate::errors::StudioError;
use crate::models::package_requests::entities::PackageRequestStatus;
use crate::models::package_requests::requests::{
    PackageRequestListParams, PackageRequestListQuery, ReviewPackageRequest, SubmitPackageRequest,
};
use crate::models::package_requests::responses::{
    ApprovePackageRequestResponse, PackageRequestResponse,
};
use crate::models::packages::requests::validate_package_terms;
use crate::models::payments::entities::PaymentMethod;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::validate_reason;

const MAX_TEXT_CHARS: usize = 500;

fn invalid_status(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::PackageRequestInvalidStatus,
        message,
    ))
}

fn too_long(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.chars().count() > MAX_TEXT_CHARS)
}

pub struct PackageRequestService {
    storage: Option<Arc<dyn Storage>>,
}

impl PackageRequestService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    fn notifier(&self, storage: Arc<dyn Storage>) -> Notifier {
        Notifier::new(storage, &AppConfig::get().studio)
    }

    pub async fn submit(
        &self,
        body: SubmitPackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        if me.role != UserRole::Customer {
            return Ok(forbidden(
                ErrorCode::PackagePermissionDenied,
                "Only customers can request packages",
            ));
        }
        if let Err(msg) = validate_package_terms(body.total_sessions, body.validity_days, body.price)
        {
            return Ok(bad_request(ErrorCode::PackageRequestInvalid, msg));
        }
        if too_long(body.payment_reference.as_deref()) || too_long(body.note.as_deref()) {
            return Ok(bad_request(
                ErrorCode::PackageRequestInvalid,
                format!("Payment reference and note are limited to {MAX_TEXT_CHARS} characters"),
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.create_package_request(me.id, body).await {
            Ok(created) => {
                info!("Customer {} submitted package request #{}", me.id, created.id);
                self.notifier(storage.clone())
                    .package_request_submitted(&created)
                    .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    PackageRequestResponse { request: created },
                    "Package request submitted",
                )))
            }
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 管理员查看全部，顾客只看自己的
    pub async fn list(
        &self,
        query: PackageRequestListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;

        let customer_id = match me.role {
            UserRole::Admin => query.customer_id,
            _ => Some(me.id),
        };
        let list_query = PackageRequestListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            status: query.status,
            customer_id,
        };

        match storage
            .list_package_requests_with_pagination(list_query)
            .await
        {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Package requests retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 批准后在同一事务内创建课程包与流水
    pub async fn approve(
        &self,
        request_id: i64,
        body: ReviewPackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;

        let note = body
            .review_note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if too_long(note.as_deref()) {
            return Ok(bad_request(
                ErrorCode::PackageRequestInvalid,
                format!("Review note is limited to {MAX_TEXT_CHARS} characters"),
            ));
        }
        let method = body.payment_method.unwrap_or(PaymentMethod::Transfer);

        match storage
            .approve_package_request(request_id, me.id, note, method, Utc::now())
            .await
        {
            Ok(Some((approved, package, payment))) => {
                info!(
                    "Package request #{} approved by {}: package #{}, payment {:?}",
                    approved.id,
                    me.id,
                    package.id,
                    payment.map(|p| p.id)
                );
                self.notifier(storage.clone())
                    .package_approved(&approved, &package)
                    .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    ApprovePackageRequestResponse {
                        request: approved,
                        package,
                    },
                    "Package request approved",
                )))
            }
            Ok(None) => Ok(not_found(
                ErrorCode::PackageRequestNotFound,
                "Package request not found",
            )),
            Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 拒绝必须说明原因
    pub async fn reject(
        &self,
        request_id: i64,
        body: ReviewPackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let note = match validate_reason(body.review_note.as_deref()) {
            Ok(note) => note,
            Err(msg) => return Ok(bad_request(ErrorCode::PackageRequestInvalid, msg)),
        };

        let storage = self.get_storage(request)?;
        match storage
            .close_package_request(
                request_id,
                PackageRequestStatus::Rejected,
                Some(me.id),
                Some(note),
            )
            .await
        {
            Ok(Some(rejected)) => {
                info!("Package request #{} rejected by {}", rejected.id, me.id);
                self.notifier(storage.clone())
                    .package_rejected(&rejected)
                    .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    PackageRequestResponse { request: rejected },
                    "Package request rejected",
                )))
            }
            Ok(None) => Ok(not_found(
                ErrorCode::PackageRequestNotFound,
                "Package request not found",
            )),
            Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 顾客撤回自己待审核的申请
    pub async fn cancel(&self, request_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_package_request_by_id(request_id).await {
            Ok(Some(existing)) if existing.customer_id == me.id => {}
            Ok(_) => {
                return Ok(not_found(
                    ErrorCode::PackageRequestNotFound,
                    "Package request not found",
                ));
            }
            Err(e) => return Ok(storage_error_response(&e)),
        }

        match storage
            .close_package_request(request_id, PackageRequestStatus::Cancelled, None, None)
            .await
        {
            Ok(Some(cancelled)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                PackageRequestResponse { request: cancelled },
                "Package request cancelled",
            ))),
            Ok(None) => Ok(not_found(
                ErrorCode::PackageRequestNotFound,
                "Package request not found",
            )),
            Err(StudioError::InvalidTransition(msg)) => Ok(invalid_status(msg)),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }
}
