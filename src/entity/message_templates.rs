//! 消息模板实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "message_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_active: bool,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_template(self) -> crate::models::templates::entities::MessageTemplate {
        use crate::models::templates::entities::MessageTemplate;
        use crate::utils::time::from_timestamp;

        MessageTemplate {
            key: self.key,
            content: self.content,
            is_active: self.is_active,
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
