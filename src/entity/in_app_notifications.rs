//! 站内通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "in_app_notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
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
    pub fn into_in_app(self) -> crate::models::notifications::entities::InAppNotification {
        use crate::models::notifications::entities::{InAppNotification, InAppNotificationType};
        use crate::utils::time::from_timestamp;

        InAppNotification {
            id: self.id,
            user_id: self.user_id,
            notification_type: self
                .notification_type
                .parse()
                .unwrap_or(InAppNotificationType::System),
            title: self.title,
            content: self.content,
            reference_type: self.reference_type.and_then(|s| s.parse().ok()),
            reference_id: self.reference_id,
            is_read: self.is_read,
            created_at: from_timestamp(self.created_at),
        }
    }
}
