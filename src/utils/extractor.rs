//! 安全路径参数提取器
//!
//! 直接使用 `web::Path<i64>` 时解析失败会返回纯文本 404，
//! 这里统一校验并返回 `ApiResponse` 格式的 400 错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_request(format!(
                        "Invalid path parameter '{}': {}",
                        $param, raw
                    ))),
                })
            }
        }
    };
}

define_safe_id_extractor!(SafeIDI64, "id");
define_safe_id_extractor!(SafeBookingIdI64, "booking_id");
define_safe_id_extractor!(SafePackageIdI64, "package_id");
define_safe_id_extractor!(SafeRequestIdI64, "request_id");
define_safe_id_extractor!(SafeBlockIdI64, "block_id");
define_safe_id_extractor!(SafeNotificationIdI64, "notification_id");

/// 消息模板键：小写字母、数字、下划线，最长 64
#[derive(Debug, Clone)]
pub struct SafeTemplateKey(pub String);

impl FromRequest for SafeTemplateKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("key").unwrap_or_default();
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        ready(if valid {
            Ok(SafeTemplateKey(raw.to_string()))
        } else {
            Err(bad_request(format!("Invalid template key: {raw}")))
        })
    }
}
