//! 顾客资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub nickname: Option<String>,
    pub birth_date: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
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
    pub fn into_customer(self) -> crate::models::customers::entities::Customer {
        use crate::models::customers::entities::Customer;
        use crate::utils::time::from_timestamp;

        Customer {
            user_id: self.user_id,
            nickname: self.nickname,
            birth_date: self.birth_date,
            medical_notes: self.medical_notes,
            emergency_contact: self.emergency_contact,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
