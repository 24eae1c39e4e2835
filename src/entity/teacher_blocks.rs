//! 教师封锁时段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_blocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub block_type: String,
    pub start_time: i64,
    pub end_time: i64,
    /// JSON 数组，周一 = 0
    #[sea_orm(column_type = "Text")]
    pub recurrence_days: String,
    pub recurrence_until: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_block(self) -> crate::models::bookings::entities::TeacherBlock {
        use crate::models::bookings::entities::{BlockType, TeacherBlock};
        use crate::utils::time::from_timestamp;

        TeacherBlock {
            id: self.id,
            teacher_id: self.teacher_id,
            block_type: self
                .block_type
                .parse::<BlockType>()
                .unwrap_or(BlockType::Single),
            start_time: from_timestamp(self.start_time),
            end_time: from_timestamp(self.end_time),
            recurrence_days: serde_json::from_str(&self.recurrence_days).unwrap_or_default(),
            recurrence_until: self.recurrence_until.map(from_timestamp),
            reason: self.reason,
            created_by: self.created_by,
            created_at: from_timestamp(self.created_at),
        }
    }
}
