use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::bookings::requests::{
    AvailabilityCheckQuery, AvailabilityQuery, BlockListParams, BookingListParams,
    CancelBookingRequest, CreateBlockRequest, CreateBookingRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::BookingService;
use crate::utils::{SafeBlockIdI64, SafeBookingIdI64};

// 懒加载的全局 BookingService 实例
static BOOKING_SERVICE: Lazy<BookingService> = Lazy::new(BookingService::new_lazy);

pub async fn list_bookings(
    req: HttpRequest,
    query: web::Query<BookingListParams>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.list_bookings(query.into_inner(), &req).await
}

pub async fn create_booking(
    req: HttpRequest,
    booking_data: web::Json<CreateBookingRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .create_booking(booking_data.into_inner(), &req)
        .await
}

pub async fn get_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.get_booking(booking_id.0, &req).await
}

pub async fn confirm_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.confirm_booking(booking_id.0, &req).await
}

pub async fn complete_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.complete_booking(booking_id.0, &req).await
}

pub async fn cancel_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
    cancel_data: web::Json<CancelBookingRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .cancel_booking(booking_id.0, cancel_data.into_inner(), &req)
        .await
}

pub async fn day_availability(
    req: HttpRequest,
    query: web::Query<AvailabilityQuery>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .day_availability(query.into_inner(), &req)
        .await
}

pub async fn check_availability(
    req: HttpRequest,
    query: web::Query<AvailabilityCheckQuery>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .check_availability(query.into_inner(), &req)
        .await
}

pub async fn create_block(
    req: HttpRequest,
    block_data: web::Json<CreateBlockRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .create_block(block_data.into_inner(), &req)
        .await
}

pub async fn list_blocks(
    req: HttpRequest,
    query: web::Query<BlockListParams>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.list_blocks(query.into_inner(), &req).await
}

pub async fn delete_block(
    req: HttpRequest,
    block_id: SafeBlockIdI64,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.delete_block(block_id.0, &req).await
}

// 配置路由
// 固定路径必须先于 /{booking_id} 注册
pub fn configure_booking_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/bookings")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_bookings))
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::customer_roles()))
                    .route(web::post().to(create_booking)),
            )
            .route("/availability", web::get().to(day_availability))
            .route("/availability/check", web::get().to(check_availability))
            .service(
                web::resource("/block")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(create_block)),
            )
            .service(
                web::scope("/blocks")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_blocks))
                    .route("/{block_id}", web::delete().to(delete_block)),
            )
            .route("/{booking_id}", web::get().to(get_booking))
            .route("/{booking_id}/confirm", web::post().to(confirm_booking))
            .route("/{booking_id}/complete", web::post().to(complete_booking))
            .route("/{booking_id}/cancel", web::post().to(cancel_booking)),
    );
}
