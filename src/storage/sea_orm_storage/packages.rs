use super::SeaOrmStorage;
use super::payments::insert_payment;
use crate::entity::package_adjustments::{
    ActiveModel as AdjustmentActiveModel, Column as AdjustmentColumn, Entity as PackageAdjustments,
};
use crate::entity::packages::{ActiveModel, Column, Entity as Packages};
use crate::errors::{Result, StudioError};
use crate::models::packages::{
    entities::{AdjustmentPlan, Package, PackageAdjustment, PackageStatus, SessionType},
    requests::{NewPackage, PackageListQuery},
    responses::PackageListResponse,
};
use crate::models::payments::{entities::PaymentReport, requests::NewPayment};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 写入课程包（可在事务内调用）
pub(super) async fn insert_package<C: ConnectionTrait>(
    conn: &C,
    package: NewPackage,
) -> Result<Package> {
    let now = Utc::now();

    let model = ActiveModel {
        customer_id: Set(package.customer_id),
        session_type: Set(package.session_type.to_string()),
        total_sessions: Set(package.total_sessions),
        remaining_sessions: Set(package.total_sessions),
        price: Set(package.price),
        start_date: Set(package.start_date.timestamp()),
        expiry_date: Set(package.expiry_date.timestamp()),
        status: Set(
            Package::derive_status(package.total_sessions, package.expiry_date, now).to_string(),
        ),
        source_request_id: Set(package.source_request_id),
        created_at: Set(now.timestamp()),
        updated_at: Set(now.timestamp()),
        ..Default::default()
    };

    let result = model
        .insert(conn)
        .await
        .map_err(|e| StudioError::database_operation(format!("创建课程包失败: {e}")))?;

    Ok(result.into_package())
}

impl SeaOrmStorage {
    /// 创建课程包，金额大于 0 时同时写入流水
    pub async fn create_package_impl(
        &self,
        package: NewPackage,
        payment: Option<NewPayment>,
    ) -> Result<(Package, Option<PaymentReport>)> {
        let txn = self.db.begin().await?;

        let created = insert_package(&txn, package).await?;
        let payment = match payment {
            Some(mut payment) => {
                payment.package_id = Some(created.id);
                payment.session_type = Some(created.session_type);
                Some(insert_payment(&txn, payment).await?)
            }
            None => None,
        };

        txn.commit().await?;
        Ok((created, payment))
    }

    pub async fn get_package_by_id_impl(&self, id: i64) -> Result<Option<Package>> {
        let result = Packages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询课程包失败: {e}")))?;

        Ok(result.map(|m| m.into_package()))
    }

    pub async fn list_packages_with_pagination_impl(
        &self,
        query: PackageListQuery,
    ) -> Result<PackageListResponse> {
        let mut select = Packages::find();

        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(session_type) = query.session_type {
            select = select.filter(Column::SessionType.eq(session_type.to_string()));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "课程包")
            .await?;

        Ok(PackageListResponse {
            items: items.into_iter().map(|m| m.into_package()).collect(),
            pagination,
        })
    }

    pub async fn list_active_packages_impl(
        &self,
        customer_id: i64,
        session_type: SessionType,
    ) -> Result<Vec<Package>> {
        let result = Packages::find()
            .filter(Column::CustomerId.eq(customer_id))
            .filter(Column::SessionType.eq(session_type.to_string()))
            .filter(Column::Status.eq(PackageStatus::Active.to_string()))
            .filter(Column::RemainingSessions.gt(0))
            .order_by_asc(Column::ExpiryDate)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询课程包失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_package()).collect())
    }

    /// 按已校验的方案调整课程包并写入调整记录
    pub async fn adjust_package_impl(
        &self,
        package_id: i64,
        plan: AdjustmentPlan,
        adjusted_by: i64,
    ) -> Result<Option<(Package, PackageAdjustment)>> {
        let txn = self.db.begin().await?;

        let Some(existing) = Packages::find_by_id(package_id).one(&txn).await? else {
            return Ok(None);
        };
        let now = Utc::now().timestamp();
        let remaining_before = existing.remaining_sessions;
        let expiry_before = existing.expiry_date;

        let mut model: ActiveModel = existing.into();
        model.remaining_sessions = Set(plan.remaining_after);
        model.expiry_date = Set(plan.expiry_after.timestamp());
        model.status = Set(plan.status_after.to_string());
        model.updated_at = Set(now);
        let package = model
            .update(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("调整课程包失败: {e}")))?;

        let adjustment = AdjustmentActiveModel {
            package_id: Set(package_id),
            sessions_delta: Set(plan.sessions_delta),
            remaining_before: Set(remaining_before),
            remaining_after: Set(plan.remaining_after),
            expiry_before: Set(expiry_before),
            expiry_after: Set(plan.expiry_after.timestamp()),
            reason: Set(plan.reason),
            adjusted_by: Set(adjusted_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| StudioError::database_operation(format!("写入调整记录失败: {e}")))?;

        txn.commit().await?;
        Ok(Some((package.into_package(), adjustment.into_adjustment())))
    }

    pub async fn list_package_adjustments_impl(
        &self,
        package_id: i64,
    ) -> Result<Vec<PackageAdjustment>> {
        let result = PackageAdjustments::find()
            .filter(AdjustmentColumn::PackageId.eq(package_id))
            .order_by_desc(AdjustmentColumn::CreatedAt)
            .order_by_desc(AdjustmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询调整记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_adjustment()).collect())
    }

    /// 将到期的有效课程包标记为 expired
    pub async fn expire_packages_impl(&self, now: DateTime<Utc>) -> Result<Vec<Package>> {
        let due = Packages::find()
            .filter(Column::Status.eq(PackageStatus::Active.to_string()))
            .filter(Column::ExpiryDate.lt(now.timestamp()))
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询到期课程包失败: {e}")))?;

        let mut expired = Vec::with_capacity(due.len());
        for existing in due {
            // 仅当状态仍为 active 时更新，避免覆盖并发的人工调整
            let result = Packages::update_many()
                .col_expr(
                    Column::Status,
                    sea_orm::sea_query::Expr::value(PackageStatus::Expired.to_string()),
                )
                .col_expr(
                    Column::UpdatedAt,
                    sea_orm::sea_query::Expr::value(now.timestamp()),
                )
                .filter(Column::Id.eq(existing.id))
                .filter(Column::Status.eq(PackageStatus::Active.to_string()))
                .exec(&self.db)
                .await?;

            if result.rows_affected > 0 {
                let mut package = existing.into_package();
                package.status = PackageStatus::Expired;
                expired.push(package);
            }
        }

        Ok(expired)
    }

    pub async fn count_outstanding_sessions_impl(&self) -> Result<i64> {
        let active = Packages::find()
            .filter(Column::Status.eq(PackageStatus::Active.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("统计剩余课时失败: {e}")))?;

        Ok(active
            .iter()
            .map(|p| p.remaining_sessions.max(0) as i64)
            .sum())
    }

    pub async fn count_packages_created_impl(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let mut select = Packages::find();
        if let Some(from) = from {
            select = select.filter(Column::CreatedAt.gte(from.timestamp()));
        }
        if let Some(to) = to {
            select = select.filter(Column::CreatedAt.lt(to.timestamp()));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("统计课程包数量失败: {e}")))?;

        Ok(count as i64)
    }
}
