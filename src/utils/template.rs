use std::collections::HashMap;

/// 渲染消息模板，`{name}` 形式的占位符替换为变量值
///
/// 未提供的占位符原样保留，方便管理员在后台发现拼写错误。
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                let is_ident = !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                match vars.get(name) {
                    Some(value) if is_ident => output.push_str(value),
                    _ => {
                        output.push('{');
                        output.push_str(name);
                        output.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                output.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<&'static str, String> {
        HashMap::from([
            ("customer_name", "Ploy".to_string()),
            ("start_time", "2025-03-02 09:00".to_string()),
        ])
    }

    #[test]
    fn test_render_replaces_known_placeholders() {
        let out = render_template("Hi {customer_name}, see you at {start_time}.", &vars());
        assert_eq!(out, "Hi Ploy, see you at 2025-03-02 09:00.");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let out = render_template("Teacher: {teacher_name}", &vars());
        assert_eq!(out, "Teacher: {teacher_name}");
    }

    #[test]
    fn test_render_unclosed_brace() {
        let out = render_template("Hello {customer_name", &vars());
        assert_eq!(out, "Hello {customer_name");
    }

    #[test]
    fn test_render_non_ascii_text() {
        let out = render_template("สวัสดี {customer_name} ค่ะ", &vars());
        assert_eq!(out, "สวัสดี Ploy ค่ะ");
    }
}
