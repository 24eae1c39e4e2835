use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/template.ts")]
pub struct UpdateTemplateRequest {
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

/// 模板内容校验：非空、长度上限与 LINE 文本消息一致
pub fn validate_template_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("Template content cannot be empty");
    }
    if content.chars().count() > 5000 {
        return Err("Template content cannot exceed 5000 characters");
    }
    if content.matches('{').count() != content.matches('}').count() {
        return Err("Template placeholders are unbalanced");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_template_content() {
        assert!(validate_template_content("Hi {name}, see you at {start_time}").is_ok());
        assert!(validate_template_content("   ").is_err());
        assert!(validate_template_content("Hi {name").is_err());
        assert!(validate_template_content(&"a".repeat(5001)).is_err());
    }
}
