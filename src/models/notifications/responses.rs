use serde::Serialize;
use ts_rs::TS;

use super::entities::InAppNotification;
use crate::models::common::PaginationInfo;

/// 通知列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct NotificationListResponse {
    pub items: Vec<InAppNotification>,
    pub pagination: PaginationInfo,
}

/// 未读通知数量响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// 标记全部已读响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct MarkAllReadResponse {
    pub marked_count: i64,
}
