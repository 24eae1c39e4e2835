use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 用户角色
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/user.ts")]
    pub enum UserRole("用户角色") {
        Customer => "customer",
        Teacher => "teacher",
        Admin => "admin",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 教师与管理员（排班、确认课程）
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    /// 顾客与管理员（预约、购买课程包）
    pub fn customer_roles() -> &'static [&'static UserRole] {
        &[&Self::Customer, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Customer, &Self::Teacher, &Self::Admin]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }
}

define_string_enum! {
    /// 用户状态
    #[derive(TS)]
    #[ts(export, export_to = "../web/src/types/generated/user.ts")]
    pub enum UserStatus("用户状态") {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: String,
    pub phone: Option<String>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub line_user_id: Option<String>,
    pub line_linked: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 模板与通知中使用的称呼
    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(self.id, self.role, refresh_token_expiry)
            .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("student".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_lists_supported() {
        let err = serde_json::from_str::<UserRole>(r#""owner""#).unwrap_err();
        assert!(err.to_string().contains("customer, teacher, admin"));
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Teacher.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Customer.is_staff());
    }
}
