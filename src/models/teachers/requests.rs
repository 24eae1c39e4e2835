use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub bio: Option<String>,
    pub specialties: Option<Vec<String>>,
    /// 仅管理员可修改
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub active_only: bool,
}
