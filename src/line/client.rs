use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::LineConfig;
use crate::errors::Result;
use crate::models::notifications::entities::DeliveryOutcome;

const PUSH_PATH: &str = "/v2/bot/message/push";
const REPLY_PATH: &str = "/v2/bot/message/reply";
/// LINE 单条文本消息上限
const MAX_TEXT_CHARS: usize = 5000;

/// LINE Messaging API 客户端
///
/// 未启用或缺少 access token 时所有发送都返回 `Skipped`，不发起网络请求。
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    api_base: String,
    access_token: String,
    enabled: bool,
}

impl LineClient {
    pub fn new(config: &LineConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout.max(1)))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.channel_access_token.clone(),
            enabled: config.enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.access_token.is_empty()
    }

    /// 推送文本消息
    ///
    /// `retry_key` 对同一条消息的多次尝试保持不变，LINE 据此去重。
    pub async fn push_text(&self, to: &str, text: &str, retry_key: Uuid) -> DeliveryOutcome {
        let body = json!({
            "to": to,
            "messages": [text_message(text)],
        });
        self.post(PUSH_PATH, body, Some(retry_key)).await
    }

    /// 用 webhook 的 reply token 回复
    pub async fn reply_text(&self, reply_token: &str, text: &str) -> DeliveryOutcome {
        let body = json!({
            "replyToken": reply_token,
            "messages": [text_message(text)],
        });
        self.post(REPLY_PATH, body, None).await
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        retry_key: Option<Uuid>,
    ) -> DeliveryOutcome {
        if !self.is_enabled() {
            return DeliveryOutcome::Skipped("LINE messaging is disabled".to_string());
        }

        let mut request = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.access_token)
            .json(&body);
        if let Some(key) = retry_key {
            request = request.header("X-Line-Retry-Key", key.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("LINE request to {} failed: {}", path, e);
                return DeliveryOutcome::Failed(format!("Request failed: {e}"));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("LINE request to {} succeeded", path);
            return DeliveryOutcome::Sent;
        }
        // 相同 retry key 已被受理
        if status == StatusCode::CONFLICT && retry_key.is_some() {
            return DeliveryOutcome::Sent;
        }

        let detail = response.text().await.unwrap_or_default();
        warn!("LINE request to {} returned {}: {}", path, status, detail);
        DeliveryOutcome::Failed(format!("HTTP {}: {}", status.as_u16(), truncate(&detail, 500)))
    }
}

/// 同一条推送记录在各次尝试间使用相同的 retry key
pub fn retry_key(notification_id: i64, created_at: i64) -> Uuid {
    Uuid::from_u64_pair(created_at as u64, notification_id as u64)
}

fn text_message(text: &str) -> serde_json::Value {
    json!({ "type": "text", "text": truncate(text, MAX_TEXT_CHARS) })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool) -> LineConfig {
        let _ = rustls::crypto::ring::default_provider().install_default();
        LineConfig {
            enabled,
            // 不可达地址，测试中不应真正发出请求
            api_base: "http://127.0.0.1:9/".to_string(),
            channel_access_token: "token".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_client_skips() {
        let client = LineClient::new(&config(false)).unwrap();
        assert!(!client.is_enabled());
        let outcome = client.push_text("U1", "hello", retry_key(1, 0)).await;
        assert!(matches!(outcome, DeliveryOutcome::Skipped(_)));
    }

    #[test]
    fn test_missing_token_counts_as_disabled() {
        let mut cfg = config(true);
        cfg.channel_access_token.clear();
        assert!(!LineClient::new(&cfg).unwrap().is_enabled());
    }

    #[test]
    fn test_retry_key_is_stable() {
        assert_eq!(retry_key(7, 1_700_000_000), retry_key(7, 1_700_000_000));
        assert_ne!(retry_key(7, 1_700_000_000), retry_key(8, 1_700_000_000));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("สวัสดีครับ", 3), "สวั");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = LineClient::new(&config(true)).unwrap();
        assert_eq!(client.api_base, "http://127.0.0.1:9");
    }
}
