//! 预约存储操作
//!
//! 创建与取消都在事务内完成：时段判定、课时扣减/退还与预约行一起提交。

use super::SeaOrmStorage;
use super::blocks::blocks_in_window;
use crate::entity::bookings::{ActiveModel, Column, Entity as Bookings, Model as BookingModel};
use crate::entity::packages::{Column as PackageColumn, Entity as Packages};
use crate::entity::teacher_blocks::{Column as BlockColumn, Entity as TeacherBlocks};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, StudioError};
use crate::models::bookings::{
    entities::{Booking, BookingCreation, BookingStatus},
    requests::{BookingListQuery, CancelBooking, NewBooking},
    responses::BookingListResponse,
};
use crate::models::packages::entities::Package;
use crate::scheduling::{SlotBooking, SlotRequest, StudioRules, TimeRange, evaluate_slot};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

fn active_statuses() -> Vec<String> {
    vec![
        BookingStatus::Pending.to_string(),
        BookingStatus::Confirmed.to_string(),
    ]
}

/// 与 `[from, to)` 相交
fn overlapping(from: DateTime<Utc>, to: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(Column::StartTime.lt(to.timestamp()))
        .add(Column::EndTime.gt(from.timestamp()))
}

fn participant(teacher_id: Option<i64>, customer_id: Option<i64>) -> Condition {
    let mut cond = Condition::any();
    if let Some(teacher_id) = teacher_id {
        cond = cond.add(Column::TeacherId.eq(teacher_id));
    }
    if let Some(customer_id) = customer_id {
        cond = cond.add(Column::CustomerId.eq(customer_id));
    }
    cond
}

/// 以比较交换方式写入课程包剩余课时，并重新推导状态
async fn swap_remaining<C: ConnectionTrait>(
    conn: &C,
    package: &Package,
    remaining_after: i32,
    now: DateTime<Utc>,
) -> Result<Option<Package>> {
    let status = Package::derive_status(remaining_after, package.expiry_date, now);
    let result = Packages::update_many()
        .col_expr(PackageColumn::RemainingSessions, Expr::value(remaining_after))
        .col_expr(PackageColumn::Status, Expr::value(status.to_string()))
        .col_expr(PackageColumn::UpdatedAt, Expr::value(now.timestamp()))
        .filter(PackageColumn::Id.eq(package.id))
        .filter(PackageColumn::RemainingSessions.eq(package.remaining_sessions))
        .exec(conn)
        .await
        .map_err(|e| StudioError::database_operation(format!("更新课程包课时失败: {e}")))?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    let mut updated = package.clone();
    updated.remaining_sessions = remaining_after;
    updated.status = status;
    updated.updated_at = now;
    Ok(Some(updated))
}

impl SeaOrmStorage {
    /// 判定时段、扣减课时并写入预约
    pub async fn create_booking_impl(
        &self,
        new: NewBooking,
        rules: StudioRules,
        now: DateTime<Utc>,
    ) -> Result<BookingCreation> {
        let txn = self.db.begin().await?;

        // 锁住教师行，同一教师的预约串行判定（SQLite 下为空操作）
        Users::find_by_id(new.teacher_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let existing: Vec<SlotBooking> = Bookings::find()
            .filter(participant(Some(new.teacher_id), Some(new.customer_id)))
            .filter(Column::Status.is_in(active_statuses()))
            .filter(overlapping(new.start_time, new.end_time))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| SlotBooking::from(&m.into_booking()))
            .collect();

        let blocks: Vec<_> = TeacherBlocks::find()
            .filter(BlockColumn::TeacherId.eq(new.teacher_id))
            .filter(blocks_in_window(Some(new.start_time), Some(new.end_time)))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| m.into_block())
            .collect();

        let request = SlotRequest {
            teacher_id: new.teacher_id,
            range: TimeRange::new(new.start_time, new.end_time),
            session_type: Some(new.session_type),
            customer_id: Some(new.customer_id),
        };
        let availability = evaluate_slot(&request, &existing, &blocks, &rules, now);
        if let Some(reason) = availability.blocked_reason() {
            return Ok(BookingCreation::SlotUnavailable(reason));
        }

        let package = match new.package_id {
            Some(package_id) => {
                let Some(model) = Packages::find_by_id(package_id).one(&txn).await? else {
                    return Ok(BookingCreation::PackageUnavailable);
                };
                let package = model.into_package();
                if package.customer_id != new.customer_id
                    || !package.covers(new.session_type, new.start_time)
                {
                    return Ok(BookingCreation::PackageUnavailable);
                }
                match swap_remaining(&txn, &package, package.remaining_sessions - 1, now).await? {
                    Some(updated) => Some(updated),
                    None => return Ok(BookingCreation::PackageUnavailable),
                }
            }
            None => None,
        };

        let ts = now.timestamp();
        let booking = ActiveModel {
            customer_id: Set(new.customer_id),
            teacher_id: Set(new.teacher_id),
            package_id: Set(new.package_id),
            session_type: Set(new.session_type.to_string()),
            start_time: Set(new.start_time.timestamp()),
            end_time: Set(new.end_time.timestamp()),
            status: Set(new.status.to_string()),
            note: Set(new.note),
            session_refunded: Set(false),
            reminder_24h_sent: Set(false),
            reminder_6h_sent: Set(false),
            created_at: Set(ts),
            updated_at: Set(ts),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| StudioError::database_operation(format!("创建预约失败: {e}")))?;

        txn.commit().await?;

        Ok(BookingCreation::Created {
            booking: booking.into_booking(),
            package,
        })
    }

    pub async fn get_booking_by_id_impl(&self, id: i64) -> Result<Option<Booking>> {
        let result = Bookings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询预约失败: {e}")))?;

        Ok(result.map(|m| m.into_booking()))
    }

    pub async fn list_bookings_with_pagination_impl(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse> {
        let mut select = Bookings::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::StartTime.gte(from.timestamp()));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::StartTime.lt(to.timestamp()));
        }

        select = select
            .order_by_desc(Column::StartTime)
            .order_by_desc(Column::Id);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "预约")
            .await?;

        Ok(BookingListResponse {
            items: items.into_iter().map(|m| m.into_booking()).collect(),
            pagination,
        })
    }

    pub async fn list_bookings_in_range_impl(
        &self,
        teacher_id: Option<i64>,
        customer_id: Option<i64>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<Booking>> {
        let mut select = Bookings::find().filter(overlapping(from, to));

        if teacher_id.is_some() || customer_id.is_some() {
            select = select.filter(participant(teacher_id, customer_id));
        }
        if active_only {
            select = select.filter(Column::Status.is_in(active_statuses()));
        }

        let result = select
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询预约失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_booking()).collect())
    }

    /// 状态迁移，仅当当前状态为 `from` 时生效
    pub async fn update_booking_status_impl(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>> {
        if !from.can_transition(to) {
            return Err(StudioError::invalid_transition(format!(
                "Cannot move booking from {from} to {to}"
            )));
        }

        let result = Bookings::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新预约状态失败: {e}")))?;

        let current = self.get_booking_by_id_impl(id).await?;
        match current {
            None => Ok(None),
            Some(booking) if result.rows_affected > 0 => Ok(Some(booking)),
            Some(booking) => Err(StudioError::invalid_transition(format!(
                "Booking is already {}",
                booking.status
            ))),
        }
    }

    /// 取消预约，`refund` 为真且关联课程包时退还一次课时
    pub async fn cancel_booking_impl(
        &self,
        cancel: CancelBooking,
    ) -> Result<Option<(Booking, Option<Package>)>> {
        let txn = self.db.begin().await?;

        let Some(model) = Bookings::find_by_id(cancel.booking_id).one(&txn).await? else {
            return Ok(None);
        };
        let booking = model.clone().into_booking();
        if !booking.status.can_transition(BookingStatus::Cancelled) {
            return Err(StudioError::invalid_transition(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let now = Utc::now();
        let claimed = Bookings::update_many()
            .col_expr(Column::Status, Expr::value(BookingStatus::Cancelled.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now.timestamp()))
            .filter(Column::Id.eq(booking.id))
            .filter(Column::Status.eq(booking.status.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("取消预约失败: {e}")))?;
        if claimed.rows_affected == 0 {
            return Err(StudioError::conflict("Booking was modified concurrently"));
        }

        let mut refunded_package = None;
        let mut refunded = false;
        if cancel.refund
            && let Some(package_id) = booking.package_id
            && let Some(package_model) = Packages::find_by_id(package_id).one(&txn).await?
        {
            let package = package_model.into_package();
            let remaining_after = (package.remaining_sessions + 1).min(package.total_sessions);
            refunded = remaining_after > package.remaining_sessions;
            refunded_package = swap_remaining(&txn, &package, remaining_after, now).await?;
            if refunded_package.is_none() {
                return Err(StudioError::conflict("Package was modified concurrently"));
            }
        }

        let mut active: ActiveModel = model.into();
        active.status = Set(BookingStatus::Cancelled.to_string());
        active.cancel_reason = Set(cancel.reason);
        active.cancelled_by = Set(Some(cancel.cancelled_by));
        active.cancelled_at = Set(Some(now.timestamp()));
        active.session_refunded = Set(refunded);
        active.updated_at = Set(now.timestamp());
        let updated: BookingModel = active
            .update(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("取消预约失败: {e}")))?;

        txn.commit().await?;
        Ok(Some((updated.into_booking(), refunded_package)))
    }

    pub async fn list_bookings_for_reminders_impl(
        &self,
        now: DateTime<Utc>,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        let result = Bookings::find()
            .filter(Column::Status.eq(BookingStatus::Confirmed.to_string()))
            .filter(Column::StartTime.gt(now.timestamp()))
            .filter(Column::StartTime.lte(horizon.timestamp()))
            .filter(
                Condition::any()
                    .add(Column::Reminder24hSent.eq(false))
                    .add(Column::Reminder6hSent.eq(false)),
            )
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询待提醒预约失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_booking()).collect())
    }

    pub async fn mark_reminders_sent_impl(
        &self,
        id: i64,
        reminder_24h: bool,
        reminder_6h: bool,
    ) -> Result<bool> {
        if !reminder_24h && !reminder_6h {
            return Ok(false);
        }

        let mut update = Bookings::update_many();
        if reminder_24h {
            update = update.col_expr(Column::Reminder24hSent, Expr::value(true));
        }
        if reminder_6h {
            update = update.col_expr(Column::Reminder6hSent, Expr::value(true));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新提醒标记失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
