use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// base64(HMAC-SHA256(channel secret, body))
pub fn sign(channel_secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// 校验 `X-Line-Signature`，比较为常量时间
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    if channel_secret.is_empty() {
        return false;
    }
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8c570fa6dd201bb328f1c1eac23a96d8";
    const BODY: &[u8] = br#"{"destination":"U0","events":[]}"#;

    #[test]
    fn test_sign_then_verify() {
        let signature = sign(SECRET, BODY).unwrap();
        assert!(verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = sign(SECRET, BODY).unwrap();
        assert!(!verify_signature(SECRET, br#"{"destination":"U1","events":[]}"#, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = sign("another-secret", BODY).unwrap();
        assert!(!verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        assert!(!verify_signature(SECRET, BODY, "not base64!!"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }

    #[test]
    fn test_empty_secret_never_verifies() {
        let signature = sign("", BODY).unwrap();
        assert!(!verify_signature("", BODY, &signature));
    }
}
