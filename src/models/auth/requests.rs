use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 顾客自助注册请求，注册后角色固定为 customer
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

// 更新个人资料
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// 修改密码时必须同时提供当前密码
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}
