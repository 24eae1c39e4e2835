//! LINE 推送队列实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub template_key: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub scheduled_at: i64,
    pub status: String,
    pub attempts: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    pub sent_at: Option<i64>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::notifications::entities::{Notification, NotificationStatus};
        use crate::utils::time::from_timestamp;

        Notification {
            id: self.id,
            user_id: self.user_id,
            template_key: self.template_key,
            content: self.content,
            scheduled_at: from_timestamp(self.scheduled_at),
            status: self
                .status
                .parse::<NotificationStatus>()
                .unwrap_or(NotificationStatus::Pending),
            attempts: self.attempts,
            last_error: self.last_error,
            sent_at: self.sent_at.map(from_timestamp),
            reference_type: self.reference_type.and_then(|s| s.parse().ok()),
            reference_id: self.reference_id,
            created_at: from_timestamp(self.created_at),
        }
    }
}
