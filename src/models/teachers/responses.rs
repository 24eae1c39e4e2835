use serde::Serialize;
use ts_rs::TS;

use super::entities::Teacher;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::User;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/teacher.ts")]
pub struct TeacherResponse {
    pub user: User,
    pub teacher: Teacher,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/teacher.ts")]
pub struct TeacherListResponse {
    pub items: Vec<TeacherResponse>,
    pub pagination: PaginationInfo,
}
