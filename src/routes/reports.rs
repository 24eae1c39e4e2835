use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{PaymentListParams, RecordPaymentRequest};
use crate::models::reports::requests::ReportRangeQuery;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn finance_report(
    req: HttpRequest,
    query: web::Query<ReportRangeQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.finance(query.into_inner(), &req).await
}

pub async fn teacher_report(
    req: HttpRequest,
    query: web::Query<ReportRangeQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.teachers(query.into_inner(), &req).await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    payment_data: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .record_payment(payment_data.into_inner(), &req)
        .await
}

pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("/finance", web::get().to(finance_report))
                    .route("/teachers", web::get().to(teacher_report))
                    .route("/payments", web::get().to(list_payments))
                    .route("/payments", web::post().to(record_payment)),
            ),
    );
}
