use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::LineWebhookService;

static LINE_WEBHOOK_SERVICE: Lazy<LineWebhookService> = Lazy::new(LineWebhookService::new_lazy);

// 签名按原始字节校验，不能先反序列化
pub async fn webhook(req: HttpRequest, body: web::Bytes) -> ActixResult<HttpResponse> {
    LINE_WEBHOOK_SERVICE.handle_webhook(body, &req).await
}

pub fn configure_line_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/line/webhook")
            .wrap(middlewares::RateLimit::line_webhook())
            .route(web::post().to(webhook)),
    );
}
