use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::package_requests::requests::{
    PackageRequestListParams, ReviewPackageRequest, SubmitPackageRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PackageRequestService;
use crate::utils::SafeRequestIdI64;

static PACKAGE_REQUEST_SERVICE: Lazy<PackageRequestService> =
    Lazy::new(PackageRequestService::new_lazy);

pub async fn submit_request(
    req: HttpRequest,
    request_data: web::Json<SubmitPackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_REQUEST_SERVICE
        .submit(request_data.into_inner(), &req)
        .await
}

pub async fn list_requests(
    req: HttpRequest,
    query: web::Query<PackageRequestListParams>,
) -> ActixResult<HttpResponse> {
    PACKAGE_REQUEST_SERVICE.list(query.into_inner(), &req).await
}

pub async fn approve_request(
    req: HttpRequest,
    request_id: SafeRequestIdI64,
    review: web::Json<ReviewPackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_REQUEST_SERVICE
        .approve(request_id.0, review.into_inner(), &req)
        .await
}

pub async fn reject_request(
    req: HttpRequest,
    request_id: SafeRequestIdI64,
    review: web::Json<ReviewPackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_REQUEST_SERVICE
        .reject(request_id.0, review.into_inner(), &req)
        .await
}

pub async fn cancel_request(
    req: HttpRequest,
    request_id: SafeRequestIdI64,
) -> ActixResult<HttpResponse> {
    PACKAGE_REQUEST_SERVICE.cancel(request_id.0, &req).await
}

pub fn configure_package_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/package-requests")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_requests))
            .route("", web::post().to(submit_request))
            .route("/{request_id}/cancel", web::post().to(cancel_request))
            .service(
                web::scope("/{request_id}")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("/approve", web::post().to(approve_request))
                    .route("/reject", web::post().to(reject_request)),
            ),
    );
}
