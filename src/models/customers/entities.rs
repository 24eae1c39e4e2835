use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 顾客资料，主键即用户 ID
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/customer.ts")]
pub struct Customer {
    pub user_id: i64,
    pub nickname: Option<String>,
    /// YYYY-MM-DD
    pub birth_date: Option<String>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
