use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::customers::{ActiveModel, Column, Entity as Customers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, StudioError};
use crate::models::customers::{
    entities::Customer,
    requests::{CustomerListQuery, UpdateCustomerRequest},
    responses::{CustomerListResponse, CustomerResponse},
};
use crate::models::users::entities::UserRole;
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn get_customer_impl(&self, user_id: i64) -> Result<Option<Customer>> {
        let result = Customers::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询顾客资料失败: {e}")))?;

        Ok(result.map(|m| m.into_customer()))
    }

    /// 分页列出顾客（用户 + 资料）
    pub async fn list_customers_with_pagination_impl(
        &self,
        query: CustomerListQuery,
    ) -> Result<CustomerListResponse> {
        let mut select = Users::find().filter(UserColumn::Role.eq(UserRole::Customer.to_string()));

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(UserColumn::Username.contains(&escaped))
                    .add(UserColumn::DisplayName.contains(&escaped))
                    .add(UserColumn::Email.contains(&escaped))
                    .add(UserColumn::Phone.contains(&escaped)),
            );
        }

        select = select.order_by_asc(UserColumn::DisplayName);

        let (users, pagination) = self
            .fetch_page(select, query.page, query.size, "顾客")
            .await?;

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let mut profiles: HashMap<i64, Customer> = Customers::find()
            .filter(Column::UserId.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.user_id, m.into_customer()))
            .collect();

        let items = users
            .into_iter()
            .filter_map(|u| {
                let customer = profiles.remove(&u.id)?;
                Some(CustomerResponse {
                    user: u.into_user(),
                    customer,
                })
            })
            .collect();

        Ok(CustomerListResponse { items, pagination })
    }

    pub async fn update_customer_impl(
        &self,
        user_id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>> {
        let Some(existing) = Customers::find_by_id(user_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        // 空字符串表示清空
        let normalize = |v: String| Some(v).filter(|s| !s.trim().is_empty());

        if let Some(nickname) = update.nickname {
            model.nickname = Set(normalize(nickname));
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(normalize(birth_date));
        }
        if let Some(medical_notes) = update.medical_notes {
            model.medical_notes = Set(normalize(medical_notes));
        }
        if let Some(emergency_contact) = update.emergency_contact {
            model.emergency_contact = Set(normalize(emergency_contact));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新顾客资料失败: {e}")))?;

        Ok(Some(result.into_customer()))
    }
}
