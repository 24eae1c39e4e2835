//! 课程包购买申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "package_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub session_type: String,
    pub total_sessions: i32,
    pub validity_days: i64,
    pub price: f64,
    pub payment_reference: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_note: Option<String>,
    pub reviewed_at: Option<i64>,
    pub package_id: Option<i64>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_request(self) -> crate::models::package_requests::entities::PackageRequest {
        use crate::models::package_requests::entities::{PackageRequest, PackageRequestStatus};
        use crate::models::packages::entities::SessionType;
        use crate::utils::time::from_timestamp;

        PackageRequest {
            id: self.id,
            customer_id: self.customer_id,
            session_type: self
                .session_type
                .parse::<SessionType>()
                .unwrap_or(SessionType::Private),
            total_sessions: self.total_sessions,
            validity_days: self.validity_days,
            price: self.price,
            payment_reference: self.payment_reference,
            note: self.note,
            status: self
                .status
                .parse::<PackageRequestStatus>()
                .unwrap_or(PackageRequestStatus::Pending),
            reviewed_by: self.reviewed_by,
            review_note: self.review_note,
            reviewed_at: self.reviewed_at.map(from_timestamp),
            package_id: self.package_id,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
