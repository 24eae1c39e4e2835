use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::packages::requests::{
    AdjustPackageRequest, CreatePackageRequest, PackageListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::PackageService;
use crate::utils::SafePackageIdI64;

static PACKAGE_SERVICE: Lazy<PackageService> = Lazy::new(PackageService::new_lazy);

pub async fn list_packages(
    req: HttpRequest,
    query: web::Query<PackageListParams>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.list_packages(query.into_inner(), &req).await
}

pub async fn get_package(
    req: HttpRequest,
    package_id: SafePackageIdI64,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.get_package(package_id.0, &req).await
}

pub async fn create_package(
    req: HttpRequest,
    package_data: web::Json<CreatePackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE
        .create_package(package_data.into_inner(), &req)
        .await
}

pub async fn adjust_package(
    req: HttpRequest,
    package_id: SafePackageIdI64,
    adjust_data: web::Json<AdjustPackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE
        .adjust_package(package_id.0, adjust_data.into_inner(), &req)
        .await
}

pub async fn list_adjustments(
    req: HttpRequest,
    package_id: SafePackageIdI64,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.list_adjustments(package_id.0, &req).await
}

pub fn configure_package_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/packages")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_packages))
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route(web::post().to(create_package)),
            )
            .route("/{package_id}", web::get().to(get_package))
            .service(
                web::scope("/{package_id}")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("/adjust", web::post().to(adjust_package))
                    .route("/adjustments", web::get().to(list_adjustments)),
            ),
    );
}
