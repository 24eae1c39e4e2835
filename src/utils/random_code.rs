use rand::Rng;

/// 去掉了容易混淆的字符（0/O、1/I/L）
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机码（用于 LINE 账号绑定）
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// 生成随机密码（初始管理员账号）
pub fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 判断文本是否可能是绑定码，避免每条 LINE 消息都查缓存
pub fn looks_like_code(text: &str, length: usize) -> bool {
    text.len() == length && text.bytes().all(|b| CODE_CHARSET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code() {
        let code = generate_code(6);
        assert_eq!(code.len(), 6);
        assert!(looks_like_code(&code, 6));
    }

    #[test]
    fn test_looks_like_code() {
        assert!(looks_like_code("ABC234", 6));
        assert!(!looks_like_code("abc234", 6));
        assert!(!looks_like_code("ABC10O", 6));
        assert!(!looks_like_code("ABC23", 6));
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).chars().count(), 16);
    }
}
