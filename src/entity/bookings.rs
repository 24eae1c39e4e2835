//! 预约实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub teacher_id: i64,
    pub package_id: Option<i64>,
    pub session_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub session_refunded: bool,
    pub reminder_24h_sent: bool,
    pub reminder_6h_sent: bool,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
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
    pub fn into_booking(self) -> crate::models::bookings::entities::Booking {
        use crate::models::bookings::entities::{Booking, BookingStatus};
        use crate::models::packages::entities::SessionType;
        use crate::utils::time::from_timestamp;

        Booking {
            id: self.id,
            customer_id: self.customer_id,
            teacher_id: self.teacher_id,
            package_id: self.package_id,
            session_type: self
                .session_type
                .parse::<SessionType>()
                .unwrap_or(SessionType::Private),
            start_time: from_timestamp(self.start_time),
            end_time: from_timestamp(self.end_time),
            status: self
                .status
                .parse::<BookingStatus>()
                .unwrap_or(BookingStatus::Pending),
            note: self.note,
            cancel_reason: self.cancel_reason,
            cancelled_by: self.cancelled_by,
            cancelled_at: self.cancelled_at.map(from_timestamp),
            session_refunded: self.session_refunded,
            reminder_24h_sent: self.reminder_24h_sent,
            reminder_6h_sent: self.reminder_6h_sent,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
