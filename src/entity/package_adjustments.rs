//! 课程包调整记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "package_adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub package_id: i64,
    pub sessions_delta: i32,
    pub remaining_before: i32,
    pub remaining_after: i32,
    pub expiry_before: i64,
    pub expiry_after: i64,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub adjusted_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id"
    )]
    Package,
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_adjustment(self) -> crate::models::packages::entities::PackageAdjustment {
        use crate::models::packages::entities::PackageAdjustment;
        use crate::utils::time::from_timestamp;

        PackageAdjustment {
            id: self.id,
            package_id: self.package_id,
            sessions_delta: self.sessions_delta,
            remaining_before: self.remaining_before,
            remaining_after: self.remaining_after,
            expiry_before: from_timestamp(self.expiry_before),
            expiry_after: from_timestamp(self.expiry_after),
            reason: self.reason,
            adjusted_by: self.adjusted_by,
            created_at: from_timestamp(self.created_at),
        }
    }
}
