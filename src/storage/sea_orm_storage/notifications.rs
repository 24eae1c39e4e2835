//! 通知存储操作：LINE 推送队列与站内收件箱

use super::SeaOrmStorage;
use crate::entity::in_app_notifications::{
    ActiveModel as InAppActiveModel, Column as InAppColumn, Entity as InAppNotifications,
};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, StudioError};
use crate::models::notifications::{
    entities::{InAppNotification, Notification, NotificationStatus},
    requests::{NewInAppNotification, NewNotification},
    responses::NotificationListResponse,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 入队一条待发送的 LINE 消息
    pub async fn enqueue_notification_impl(&self, req: NewNotification) -> Result<Notification> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            template_key: Set(req.template_key),
            content: Set(req.content),
            scheduled_at: Set(req.scheduled_at.timestamp()),
            status: Set(NotificationStatus::Pending.to_string()),
            attempts: Set(0),
            last_error: Set(None),
            sent_at: Set(None),
            reference_type: Set(req.reference_type.map(|r| r.to_string())),
            reference_id: Set(req.reference_id),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("写入推送队列失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 到期待发送的消息，按计划时间先后
    pub async fn list_due_notifications_impl(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Notification>> {
        let result = Notifications::find()
            .filter(Column::Status.eq(NotificationStatus::Pending.to_string()))
            .filter(Column::ScheduledAt.lte(now.timestamp()))
            .order_by_asc(Column::ScheduledAt)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询推送队列失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_notification()).collect())
    }

    /// 记录一次发送尝试
    pub async fn record_notification_attempt_impl(
        &self,
        id: i64,
        status: NotificationStatus,
        attempts: i32,
        last_error: Option<String>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::Attempts, Expr::value(attempts))
            .col_expr(Column::LastError, Expr::value(last_error))
            .col_expr(Column::SentAt, Expr::value(sent_at.map(|t| t.timestamp())))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新推送状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建站内通知
    pub async fn create_in_app_notification_impl(
        &self,
        req: NewInAppNotification,
    ) -> Result<InAppNotification> {
        let now = Utc::now().timestamp();

        let model = InAppActiveModel {
            user_id: Set(req.user_id),
            notification_type: Set(req.notification_type.to_string()),
            title: Set(req.title),
            content: Set(req.content),
            reference_type: Set(req.reference_type.map(|r| r.to_string())),
            reference_id: Set(req.reference_id),
            is_read: Set(false),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_in_app())
    }

    /// 列出用户通知（分页）
    pub async fn list_in_app_notifications_impl(
        &self,
        user_id: i64,
        page: Option<i64>,
        size: Option<i64>,
        unread_only: bool,
    ) -> Result<NotificationListResponse> {
        let mut select = InAppNotifications::find().filter(InAppColumn::UserId.eq(user_id));

        // 未读筛选
        if unread_only {
            select = select.filter(InAppColumn::IsRead.eq(false));
        }

        select = select
            .order_by_desc(InAppColumn::CreatedAt)
            .order_by_desc(InAppColumn::Id);

        let (items, pagination) = self.fetch_page(select, page, size, "通知").await?;

        Ok(NotificationListResponse {
            items: items.into_iter().map(|m| m.into_in_app()).collect(),
            pagination,
        })
    }

    /// 获取用户未读通知数量
    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<i64> {
        let count = InAppNotifications::find()
            .filter(InAppColumn::UserId.eq(user_id))
            .filter(InAppColumn::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读，只能标记自己的通知
    pub async fn mark_notification_read_impl(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = InAppNotifications::update_many()
            .col_expr(InAppColumn::IsRead, Expr::value(true))
            .filter(InAppColumn::Id.eq(id))
            .filter(InAppColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = InAppNotifications::update_many()
            .col_expr(InAppColumn::IsRead, Expr::value(true))
            .filter(InAppColumn::UserId.eq(user_id))
            .filter(InAppColumn::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("标记全部通知已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }
}
