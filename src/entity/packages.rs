//! 课程包实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub session_type: String,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub price: f64,
    pub start_date: i64,
    pub expiry_date: i64,
    pub status: String,
    pub source_request_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::package_adjustments::Entity")]
    Adjustments,
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::package_adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adjustments.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_package(self) -> crate::models::packages::entities::Package {
        use crate::models::packages::entities::{Package, PackageStatus, SessionType};
        use crate::utils::time::from_timestamp;

        Package {
            id: self.id,
            customer_id: self.customer_id,
            session_type: self
                .session_type
                .parse::<SessionType>()
                .unwrap_or(SessionType::Private),
            total_sessions: self.total_sessions,
            remaining_sessions: self.remaining_sessions,
            price: self.price,
            start_date: from_timestamp(self.start_date),
            expiry_date: from_timestamp(self.expiry_date),
            status: self
                .status
                .parse::<PackageStatus>()
                .unwrap_or(PackageStatus::Active),
            source_request_id: self.source_request_id,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
