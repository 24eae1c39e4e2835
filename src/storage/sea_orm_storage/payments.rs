use super::SeaOrmStorage;
use crate::entity::payment_reports::{ActiveModel, Column, Entity as PaymentReports};
use crate::errors::{Result, StudioError};
use crate::models::payments::{
    entities::PaymentReport,
    requests::{NewPayment, PaymentListQuery},
    responses::PaymentListResponse,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};

/// 写入一条流水（可在事务内调用）
pub(super) async fn insert_payment<C: ConnectionTrait>(
    conn: &C,
    payment: NewPayment,
) -> Result<PaymentReport> {
    let now = Utc::now().timestamp();

    let model = ActiveModel {
        customer_id: Set(payment.customer_id),
        package_id: Set(payment.package_id),
        session_type: Set(payment.session_type.map(|t| t.to_string())),
        amount: Set(payment.amount),
        method: Set(payment.method.to_string()),
        reference: Set(payment.reference),
        recorded_by: Set(payment.recorded_by),
        paid_at: Set(payment.paid_at.timestamp()),
        note: Set(payment.note),
        created_at: Set(now),
        ..Default::default()
    };

    let result = model
        .insert(conn)
        .await
        .map_err(|e| StudioError::database_operation(format!("写入财务流水失败: {e}")))?;

    Ok(result.into_payment())
}

fn filter_paid_at(
    mut select: Select<PaymentReports>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Select<PaymentReports> {
    if let Some(from) = from {
        select = select.filter(Column::PaidAt.gte(from.timestamp()));
    }
    if let Some(to) = to {
        select = select.filter(Column::PaidAt.lt(to.timestamp()));
    }
    select
}

impl SeaOrmStorage {
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<PaymentReport> {
        insert_payment(&self.db, payment).await
    }

    pub async fn list_payments_with_pagination_impl(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        let mut select = filter_paid_at(PaymentReports::find(), query.from, query.to);

        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }

        select = select
            .order_by_desc(Column::PaidAt)
            .order_by_desc(Column::Id);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "财务流水")
            .await?;

        Ok(PaymentListResponse {
            items: items.into_iter().map(|m| m.into_payment()).collect(),
            pagination,
        })
    }

    pub async fn list_payments_in_range_impl(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PaymentReport>> {
        let result = filter_paid_at(PaymentReports::find(), from, to)
            .order_by_asc(Column::PaidAt)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询财务流水失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_payment()).collect())
    }
}
