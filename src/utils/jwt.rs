use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use actix_web::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 用户 ID
    pub role: UserRole,        // 用户角色
    pub token_type: TokenType, // access / refresh
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn sign(
    secret: &str,
    user_id: i64,
    role: UserRole,
    token_type: TokenType,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        token_type,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(
    secret: &str,
    token: &str,
    expected: TokenType,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;
    if claims.token_type != expected {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    pub fn generate_access_token(
        user_id: i64,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        sign(Self::secret(), user_id, role, TokenType::Access, ttl)
    }

    /// `ttl` 为空时使用默认刷新有效期
    pub fn generate_refresh_token(
        user_id: i64,
        role: UserRole,
        ttl: Option<Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = ttl.unwrap_or_else(|| Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        sign(Self::secret(), user_id, role, TokenType::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: UserRole,
        refresh_ttl: Option<Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_ttl)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify(Self::secret(), token, TokenType::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify(Self::secret(), token, TokenType::Refresh)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, max_age_days: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(max_age_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时覆盖为空 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_and_verify() {
        let token = sign(SECRET, 42, UserRole::Teacher, TokenType::Access, Duration::minutes(5)).unwrap();
        let claims = verify(SECRET, &token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, UserRole::Teacher);
    }

    #[test]
    fn test_refresh_token_is_not_access_token() {
        let token = sign(SECRET, 1, UserRole::Customer, TokenType::Refresh, Duration::days(1)).unwrap();
        assert!(verify(SECRET, &token, TokenType::Access).is_err());
        assert!(verify(SECRET, &token, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(SECRET, 1, UserRole::Admin, TokenType::Access, Duration::minutes(5)).unwrap();
        assert!(verify("other", &token, TokenType::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 默认校验允许 60 秒误差
        let token = sign(SECRET, 1, UserRole::Admin, TokenType::Access, Duration::minutes(-5)).unwrap();
        assert!(verify(SECRET, &token, TokenType::Access).is_err());
    }
}
