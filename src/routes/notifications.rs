use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::notifications::requests::NotificationListParams;
use crate::models::templates::requests::UpdateTemplateRequest;
use crate::models::users::entities::UserRole;
use crate::services::{NotificationService, TemplateService};
use crate::utils::{SafeNotificationIdI64, SafeTemplateKey};

static NOTIFICATION_SERVICE: Lazy<NotificationService> =
    Lazy::new(NotificationService::new_lazy);

static TEMPLATE_SERVICE: Lazy<TemplateService> = Lazy::new(TemplateService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListParams>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(query.into_inner(), &req)
        .await
}

pub async fn get_unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.get_unread_count(&req).await
}

pub async fn mark_read(
    req: HttpRequest,
    notification_id: SafeNotificationIdI64,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_read(notification_id.0, &req).await
}

pub async fn mark_all_read(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_all_read(&req).await
}

pub async fn list_templates(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEMPLATE_SERVICE.list_templates(&req).await
}

pub async fn update_template(
    req: HttpRequest,
    key: SafeTemplateKey,
    update_data: web::Json<UpdateTemplateRequest>,
) -> ActixResult<HttpResponse> {
    TEMPLATE_SERVICE
        .update_template(key.0, update_data.into_inner(), &req)
        .await
}

pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(get_unread_count))
            .route("/read-all", web::post().to(mark_all_read))
            .route("/{notification_id}/read", web::post().to(mark_read)),
    );
}

pub fn configure_template_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/message-templates")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_templates))
                    .route("/{key}", web::put().to(update_template)),
            ),
    );
}
