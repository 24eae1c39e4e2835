//! 财务流水实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub package_id: Option<i64>,
    pub session_type: Option<String>,
    pub amount: f64,
    pub method: String,
    pub reference: Option<String>,
    pub recorded_by: i64,
    pub paid_at: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: i64,
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
    pub fn into_payment(self) -> crate::models::payments::entities::PaymentReport {
        use crate::models::payments::entities::{PaymentMethod, PaymentReport};
        use crate::utils::time::from_timestamp;

        PaymentReport {
            id: self.id,
            customer_id: self.customer_id,
            package_id: self.package_id,
            session_type: self.session_type.and_then(|s| s.parse().ok()),
            amount: self.amount,
            method: self.method.parse().unwrap_or(PaymentMethod::Other),
            reference: self.reference,
            recorded_by: self.recorded_by,
            paid_at: from_timestamp(self.paid_at),
            note: self.note,
            created_at: from_timestamp(self.created_at),
        }
    }
}
