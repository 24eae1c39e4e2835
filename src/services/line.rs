//! LINE webhook
//!
//! 验签后逐个处理事件。LINE 只关心 200 响应，单个事件的失败只记录日志。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::auth::line_link::{LINK_CODE_LENGTH, consume_link_code};
use super::{Notifier, app_component};
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::line::{LineClient, WebhookEvent, WebhookPayload, events::EventMessage, verify_signature};
use crate::models::templates::entities as templates;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::random_code::looks_like_code;

pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// 文本消息中的绑定码（忽略首尾空白与大小写）
pub fn link_code_candidate(text: &str) -> Option<String> {
    let code = text.trim().to_uppercase();
    looks_like_code(&code, LINK_CODE_LENGTH).then_some(code)
}

struct WebhookContext {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    client: Arc<LineClient>,
    notifier: Notifier,
}

impl WebhookContext {
    async fn reply_template(&self, reply_token: Option<&str>, key: &str, name: Option<String>) {
        let Some(reply_token) = reply_token else {
            return;
        };
        let mut vars = HashMap::new();
        if let Some(name) = name {
            vars.insert("name", name);
        }
        match self.notifier.render(key, &vars).await {
            Ok(Some(text)) => {
                let outcome = self.client.reply_text(reply_token, &text).await;
                debug!("LINE reply {} -> {:?}", key, outcome);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to render LINE template {}: {}", key, e),
        }
    }

    async fn linked_user_name(&self, line_user_id: &str) -> Option<String> {
        match self.storage.get_user_by_line_id(line_user_id).await {
            Ok(user) => user.map(|u| u.name().to_string()),
            Err(e) => {
                warn!("Failed to look up LINE user: {}", e);
                None
            }
        }
    }

    async fn handle(&self, event: WebhookEvent) {
        let Some(line_user_id) = event.user_id().map(str::to_string) else {
            debug!("Ignoring LINE event without user id");
            return;
        };

        match event {
            WebhookEvent::Message(message) => {
                let EventMessage::Text { text } = message.message else {
                    return;
                };
                let reply_token = message.reply_token.as_deref();

                if let Some(code) = link_code_candidate(&text)
                    && let Some(user_id) = consume_link_code(self.cache.as_ref(), &code).await
                {
                    match self.storage.link_line_account(user_id, &line_user_id).await {
                        Ok(true) => {
                            info!("User {} linked a LINE account", user_id);
                            let name = self.linked_user_name(&line_user_id).await;
                            self.reply_template(reply_token, templates::LINE_LINKED, name)
                                .await;
                            return;
                        }
                        Ok(false) => warn!("LINE link target user {} no longer exists", user_id),
                        Err(e) => warn!("Failed to link LINE account for user {}: {}", user_id, e),
                    }
                }

                let name = self.linked_user_name(&line_user_id).await;
                self.reply_template(reply_token, templates::LINE_HELP, name)
                    .await;
            }
            WebhookEvent::Follow(follow) => {
                let name = self.linked_user_name(&line_user_id).await;
                self.reply_template(follow.reply_token.as_deref(), templates::LINE_WELCOME, name)
                    .await;
            }
            WebhookEvent::Unfollow(_) => {
                match self.storage.unlink_line_account(&line_user_id).await {
                    Ok(true) => info!("LINE account unlinked after unfollow"),
                    Ok(false) => {}
                    Err(e) => warn!("Failed to unlink LINE account: {}", e),
                }
            }
            WebhookEvent::Unsupported => {}
        }
    }
}

pub struct LineWebhookService;

impl LineWebhookService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn handle_webhook(
        &self,
        body: web::Bytes,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        if !config.line.enabled {
            return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::LineDisabled,
                "LINE integration is disabled",
            )));
        }

        let signature = request
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(&config.line.channel_secret, &body, signature) {
            warn!("Rejected LINE webhook with invalid signature");
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::LineSignatureInvalid,
                "Invalid signature",
            )));
        }

        let payload: WebhookPayload = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Malformed LINE webhook payload: {}", e);
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Malformed payload",
                )));
            }
        };

        let storage = app_component::<dyn Storage>(request)?;
        let context = WebhookContext {
            notifier: Notifier::new(storage.clone(), &config.studio),
            storage,
            cache: app_component::<dyn ObjectCache>(request)?,
            client: app_component::<LineClient>(request)?,
        };

        debug!("Processing {} LINE events", payload.events.len());
        for event in payload.events {
            context.handle(event).await;
        }

        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("ok")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::config::{LineConfig, StudioConfig};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::services::auth::line_link::link_code_key;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use sea_orm::{ConnectOptions, Database};

    async fn context() -> WebhookContext {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.unwrap();
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::from_connection(db).await.unwrap());

        let _ = rustls::crypto::ring::default_provider().install_default();
        WebhookContext {
            notifier: Notifier::new(storage.clone(), &StudioConfig::default()),
            storage,
            cache: Arc::new(MokaCacheWrapper::with_settings(100, 300)),
            client: Arc::new(LineClient::new(&LineConfig::default()).unwrap()),
        }
    }

    fn event(raw: &str) -> WebhookEvent {
        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        payload.events.into_iter().next().unwrap()
    }

    #[test]
    fn test_link_code_candidate() {
        assert_eq!(link_code_candidate(" abc234 "), Some("ABC234".to_string()));
        assert_eq!(link_code_candidate("ABC23"), None);
        // 0 和 O 不在字符集中
        assert_eq!(link_code_candidate("ABC230"), None);
        assert_eq!(link_code_candidate("hello there"), None);
    }

    #[tokio::test]
    async fn test_link_code_links_then_unfollow_unlinks() {
        let ctx = context().await;
        let user = ctx
            .storage
            .create_user(CreateUserRequest {
                username: "mia".to_string(),
                email: "mia@studio.test".to_string(),
                password: "hash".to_string(),
                role: UserRole::Customer,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap();
        ctx.cache
            .insert_raw(link_code_key("ABC234"), user.id.to_string(), 300)
            .await;

        ctx.handle(event(
            r#"{"events": [{"type": "message", "replyToken": "r1",
                "source": {"type": "user", "userId": "Umia"},
                "message": {"id": "1", "type": "text", "text": " abc234 "}}]}"#,
        ))
        .await;

        let linked = ctx.storage.get_user_by_line_id("Umia").await.unwrap().unwrap();
        assert_eq!(linked.id, user.id);
        // 绑定码只能使用一次
        assert!(consume_link_code(ctx.cache.as_ref(), "ABC234").await.is_none());

        ctx.handle(event(
            r#"{"events": [{"type": "unfollow", "source": {"type": "user", "userId": "Umia"}}]}"#,
        ))
        .await;

        assert!(ctx.storage.get_user_by_line_id("Umia").await.unwrap().is_none());
        let user = ctx.storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.line_user_id, None);
    }

    #[tokio::test]
    async fn test_unknown_code_does_not_link() {
        let ctx = context().await;
        ctx.handle(event(
            r#"{"events": [{"type": "message", "replyToken": "r1",
                "source": {"type": "user", "userId": "Ustranger"},
                "message": {"id": "1", "type": "text", "text": "XYZ789"}}]}"#,
        ))
        .await;
        assert!(ctx.storage.get_user_by_line_id("Ustranger").await.unwrap().is_none());
    }
}
