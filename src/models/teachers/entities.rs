use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教师资料，主键即用户 ID
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub user_id: i64,
    pub bio: Option<String>,
    pub specialties: Vec<String>,
    /// 停用的教师不再接受新预约
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
