use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, StudioError};
use crate::models::teachers::{
    entities::Teacher,
    requests::{TeacherListQuery, UpdateTeacherRequest},
    responses::{TeacherListResponse, TeacherResponse},
};
use crate::models::users::entities::UserRole;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn get_teacher_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询教师资料失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let mut select = Users::find().filter(UserColumn::Role.eq(UserRole::Teacher.to_string()));

        if query.active_only {
            let active_ids: Vec<i64> = Teachers::find()
                .filter(Column::IsActive.eq(true))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|t| t.user_id)
                .collect();
            select = select.filter(UserColumn::Id.is_in(active_ids));
        }

        select = select.order_by_asc(UserColumn::DisplayName);

        let (users, pagination) = self
            .fetch_page(select, query.page, query.size, "教师")
            .await?;

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let mut profiles: HashMap<i64, Teacher> = Teachers::find()
            .filter(Column::UserId.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.user_id, m.into_teacher()))
            .collect();

        let items = users
            .into_iter()
            .filter_map(|u| {
                let teacher = profiles.remove(&u.id)?;
                Some(TeacherResponse {
                    user: u.into_user(),
                    teacher,
                })
            })
            .collect();

        Ok(TeacherListResponse { items, pagination })
    }

    pub async fn update_teacher_impl(
        &self,
        user_id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        let Some(existing) = Teachers::find_by_id(user_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(bio) = update.bio {
            model.bio = Set(Some(bio).filter(|b| !b.trim().is_empty()));
        }
        if let Some(specialties) = update.specialties {
            model.specialties = Set(serde_json::to_string(&specialties)?);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新教师资料失败: {e}")))?;

        Ok(Some(result.into_teacher()))
    }
}
