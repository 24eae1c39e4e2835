use super::SeaOrmStorage;
use super::packages::insert_package;
use super::payments::insert_payment;
use crate::entity::package_requests::{ActiveModel, Column, Entity as PackageRequests};
use crate::errors::{Result, StudioError};
use crate::models::package_requests::{
    entities::{PackageRequest, PackageRequestStatus},
    requests::{PackageRequestListQuery, SubmitPackageRequest},
    responses::PackageRequestListResponse,
};
use crate::models::packages::{entities::Package, requests::NewPackage};
use crate::models::payments::{
    entities::{PaymentMethod, PaymentReport},
    requests::NewPayment,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_package_request_impl(
        &self,
        customer_id: i64,
        req: SubmitPackageRequest,
    ) -> Result<PackageRequest> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            customer_id: Set(customer_id),
            session_type: Set(req.session_type.to_string()),
            total_sessions: Set(req.total_sessions),
            validity_days: Set(req.validity_days),
            price: Set(req.price),
            payment_reference: Set(req.payment_reference),
            note: Set(req.note),
            status: Set(PackageRequestStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("创建购买申请失败: {e}")))?;

        Ok(result.into_request())
    }

    pub async fn get_package_request_by_id_impl(&self, id: i64) -> Result<Option<PackageRequest>> {
        let result = PackageRequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询购买申请失败: {e}")))?;

        Ok(result.map(|m| m.into_request()))
    }

    pub async fn list_package_requests_with_pagination_impl(
        &self,
        query: PackageRequestListQuery,
    ) -> Result<PackageRequestListResponse> {
        let mut select = PackageRequests::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "购买申请")
            .await?;

        Ok(PackageRequestListResponse {
            items: items.into_iter().map(|m| m.into_request()).collect(),
            pagination,
        })
    }

    /// 批准申请：有效期从批准时开始计算
    ///
    /// 先以 pending 为条件迁移状态，并发批准只有一个能成功。
    pub async fn approve_package_request_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        review_note: Option<String>,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<(PackageRequest, Package, Option<PaymentReport>)>> {
        let txn = self.db.begin().await?;

        let claimed = PackageRequests::update_many()
            .col_expr(
                Column::Status,
                Expr::value(PackageRequestStatus::Approved.to_string()),
            )
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(Column::ReviewNote, Expr::value(review_note))
            .col_expr(Column::ReviewedAt, Expr::value(now.timestamp()))
            .col_expr(Column::UpdatedAt, Expr::value(now.timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PackageRequestStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新购买申请失败: {e}")))?;

        let Some(existing) = PackageRequests::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        if claimed.rows_affected == 0 {
            return Err(StudioError::invalid_transition(format!(
                "Package request is already {}",
                existing.status
            )));
        }
        let request = existing.clone().into_request();

        let package = insert_package(
            &txn,
            NewPackage {
                customer_id: request.customer_id,
                session_type: request.session_type,
                total_sessions: request.total_sessions,
                price: request.price,
                start_date: now,
                expiry_date: now + Duration::days(request.validity_days),
                source_request_id: Some(request.id),
            },
        )
        .await?;

        // 零元课程包不记流水
        let payment = if request.price > 0.0 {
            Some(
                insert_payment(
                    &txn,
                    NewPayment {
                        customer_id: request.customer_id,
                        package_id: Some(package.id),
                        session_type: Some(package.session_type),
                        amount: request.price,
                        method,
                        reference: request.payment_reference.clone(),
                        recorded_by: reviewer_id,
                        paid_at: now,
                        note: Some(format!("Package request #{}", request.id)),
                    },
                )
                .await?,
            )
        } else {
            None
        };

        let mut model: ActiveModel = existing.into();
        model.package_id = Set(Some(package.id));
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新购买申请失败: {e}")))?;

        txn.commit().await?;
        Ok(Some((updated.into_request(), package, payment)))
    }

    /// 拒绝或撤回申请，只允许从 pending 迁移
    pub async fn close_package_request_impl(
        &self,
        id: i64,
        status: PackageRequestStatus,
        reviewer_id: Option<i64>,
        review_note: Option<String>,
    ) -> Result<Option<PackageRequest>> {
        if !matches!(
            status,
            PackageRequestStatus::Rejected | PackageRequestStatus::Cancelled
        ) {
            return Err(StudioError::invalid_transition(format!(
                "Cannot close package request as {status}"
            )));
        }

        let now = Utc::now().timestamp();
        let mut update = PackageRequests::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));
        if let Some(reviewer_id) = reviewer_id {
            update = update
                .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
                .col_expr(Column::ReviewedAt, Expr::value(now));
        }
        if review_note.is_some() {
            update = update.col_expr(
                Column::ReviewNote,
                Expr::value(review_note),
            );
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PackageRequestStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新购买申请失败: {e}")))?;

        let current = self.get_package_request_by_id_impl(id).await?;
        match current {
            None => Ok(None),
            Some(request) if result.rows_affected > 0 => Ok(Some(request)),
            Some(request) => Err(StudioError::invalid_transition(format!(
                "Package request is already {}",
                request.status
            ))),
        }
    }
}
