pub mod adjust;
pub mod create;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::packages::entities::Package;
use crate::models::packages::requests::{
    AdjustPackageRequest, CreatePackageRequest, PackageListParams, PackageListQuery,
};
use crate::models::packages::responses::PackageResponse;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::Notifier;
use crate::storage::Storage;

use super::{app_component, current_user, not_found, storage_error_response};

pub struct PackageService {
    storage: Option<Arc<dyn Storage>>,
}

impl PackageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub(crate) fn notifier(&self, storage: Arc<dyn Storage>) -> Notifier {
        Notifier::new(storage, &AppConfig::get().studio)
    }

    /// 管理员查看全部，顾客只看自己的
    pub async fn list_packages(
        &self,
        query: PackageListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;

        let customer_id = match me.role {
            UserRole::Admin => query.customer_id,
            _ => Some(me.id),
        };
        let list_query = PackageListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            customer_id,
            status: query.status,
            session_type: query.session_type,
        };

        match storage.list_packages_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Package list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn get_package(
        &self,
        package_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_package_by_id(package_id).await {
            Ok(Some(package)) if can_view(&me, &package) => Ok(HttpResponse::Ok().json(
                ApiResponse::success(PackageResponse { package }, "Package retrieved successfully"),
            )),
            Ok(_) => Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn create_package(
        &self,
        body: CreatePackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_package(self, body, request).await
    }

    pub async fn adjust_package(
        &self,
        package_id: i64,
        body: AdjustPackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        adjust::adjust_package(self, package_id, body, request).await
    }

    pub async fn list_adjustments(
        &self,
        package_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        adjust::list_adjustments(self, package_id, request).await
    }
}

fn can_view(user: &User, package: &Package) -> bool {
    user.role == UserRole::Admin || package.customer_id == user.id
}
