use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::cache::{CacheResult, ObjectCache};
use crate::models::{ApiResponse, auth::LineLinkCodeResponse};
use crate::services::current_user;
use crate::utils::random_code::generate_code;

use super::AuthService;

pub const LINK_CODE_LENGTH: usize = 6;

pub fn link_code_key(code: &str) -> String {
    format!("line_link:{code}")
}

/// 取出并作废绑定码，返回对应的用户 ID
pub async fn consume_link_code(cache: &dyn ObjectCache, code: &str) -> Option<i64> {
    let key = link_code_key(code);
    match cache.get_raw(&key).await {
        CacheResult::Found(raw) => {
            cache.remove(&key).await;
            raw.parse().ok()
        }
        _ => None,
    }
}

/// 签发一次性绑定码，用户在 LINE 官方账号中发送即可完成绑定
pub async fn handle_issue_link_code(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let cache = service.get_cache(request)?;
    let ttl = service.get_config().line.link_code_ttl;

    let code = generate_code(LINK_CODE_LENGTH);
    cache
        .insert_raw(link_code_key(&code), user.id.to_string(), ttl)
        .await;
    info!("Issued LINE link code for user {}", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LineLinkCodeResponse {
            code,
            expires_in: ttl,
        },
        "Send this code to the studio LINE account",
    )))
}
