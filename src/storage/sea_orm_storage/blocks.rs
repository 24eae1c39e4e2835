use super::SeaOrmStorage;
use crate::entity::teacher_blocks::{ActiveModel, Column, Entity as TeacherBlocks};
use crate::errors::{Result, StudioError};
use crate::models::bookings::{
    entities::{BlockType, TeacherBlock},
    requests::NewTeacherBlock,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// 可能与 `[from, to)` 相交的封锁
///
/// 周期封锁只按首次开始时间与截止日期粗筛，具体时段由调用方展开。
pub(super) fn blocks_in_window(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Condition {
    let recurring = BlockType::Recurring.to_string();
    let mut cond = Condition::all();

    if let Some(to) = to {
        cond = cond.add(Column::StartTime.lt(to.timestamp()));
    }
    if let Some(from) = from {
        // 截止时间按本地日期含当天，放宽一天
        let until_floor = (from - Duration::days(1)).timestamp();
        cond = cond.add(
            Condition::any()
                .add(
                    Condition::all()
                        .add(Column::BlockType.ne(recurring.clone()))
                        .add(Column::EndTime.gt(from.timestamp())),
                )
                .add(
                    Condition::all()
                        .add(Column::BlockType.eq(recurring))
                        .add(
                            Condition::any()
                                .add(Column::RecurrenceUntil.is_null())
                                .add(Column::RecurrenceUntil.gte(until_floor)),
                        ),
                ),
        );
    }
    cond
}

impl SeaOrmStorage {
    pub async fn create_teacher_block_impl(&self, block: NewTeacherBlock) -> Result<TeacherBlock> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(block.teacher_id),
            block_type: Set(block.block_type.to_string()),
            start_time: Set(block.start_time.timestamp()),
            end_time: Set(block.end_time.timestamp()),
            recurrence_days: Set(serde_json::to_string(&block.recurrence_days)?),
            recurrence_until: Set(block.recurrence_until.map(|t| t.timestamp())),
            reason: Set(block.reason),
            created_by: Set(block.created_by),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("创建封锁时段失败: {e}")))?;

        Ok(result.into_block())
    }

    pub async fn get_teacher_block_impl(&self, id: i64) -> Result<Option<TeacherBlock>> {
        let result = TeacherBlocks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询封锁时段失败: {e}")))?;

        Ok(result.map(|m| m.into_block()))
    }

    pub async fn list_teacher_blocks_impl(
        &self,
        teacher_id: Option<i64>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<TeacherBlock>> {
        let mut select = TeacherBlocks::find().filter(blocks_in_window(from, to));
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let result = select
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询封锁时段失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_block()).collect())
    }

    pub async fn delete_teacher_block_impl(&self, id: i64) -> Result<bool> {
        let result = TeacherBlocks::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("删除封锁时段失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
