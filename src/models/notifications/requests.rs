use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{InAppNotificationType, ReferenceType};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub unread_only: Option<bool>,
}

/// 入队一条 LINE 消息
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub template_key: String,
    pub content: String,
    pub scheduled_at: DateTime<Utc>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewInAppNotification {
    pub user_id: i64,
    pub notification_type: InAppNotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
}
