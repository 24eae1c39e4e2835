use super::SeaOrmStorage;
use crate::entity::customers::{self, Entity as Customers};
use crate::entity::teachers::{self, Entity as Teachers};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, StudioError};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    responses::UserListResponse,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 顾客、教师角色对应的资料行不存在时补建
pub(super) async fn ensure_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    role: UserRole,
    now: i64,
) -> Result<()> {
    match role {
        UserRole::Customer => {
            if Customers::find_by_id(user_id).one(conn).await?.is_none() {
                customers::ActiveModel {
                    user_id: Set(user_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(|e| StudioError::database_operation(format!("创建顾客资料失败: {e}")))?;
            }
        }
        UserRole::Teacher => {
            if Teachers::find_by_id(user_id).one(conn).await?.is_none() {
                teachers::ActiveModel {
                    user_id: Set(user_id),
                    bio: Set(None),
                    specialties: Set("[]".to_string()),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(conn)
                .await
                .map_err(|e| StudioError::database_operation(format!("创建教师资料失败: {e}")))?;
            }
        }
        UserRole::Admin => {}
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建用户，`req.password` 为已哈希的密码
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let display_name = req
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| req.username.clone());

        let txn = self.db.begin().await?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(display_name),
            phone: Set(req.phone),
            line_user_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("创建用户失败: {e}")))?;

        ensure_profile(&txn, result.id, req.role, now).await?;
        txn.commit().await?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user_by(Column::Username.eq(username)).await
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user_by(Column::Email.eq(email)).await
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user_by(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    pub async fn get_user_by_line_id_impl(&self, line_user_id: &str) -> Result<Option<User>> {
        self.find_user_by(Column::LineUserId.eq(line_user_id)).await
    }

    async fn find_user_by<F>(&self, filter: F) -> Result<Option<User>>
    where
        F: sea_orm::sea_query::IntoCondition,
    {
        let result = Users::find()
            .filter(filter)
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::DisplayName.contains(&escaped)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let (users, pagination) = self
            .fetch_page(select, query.page, query.size, "用户")
            .await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息，角色变更时补建资料行
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
            ensure_profile(&txn, id, role, now).await?;
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(display_name) = update.display_name {
            model.display_name = Set(display_name);
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone).filter(|p| !p.trim().is_empty()));
        }

        model
            .update(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新用户失败: {e}")))?;
        txn.commit().await?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 绑定 LINE 账号，先解除该 LINE ID 与其他用户的绑定
    pub async fn link_line_account_impl(&self, user_id: i64, line_user_id: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        Users::update_many()
            .col_expr(
                Column::LineUserId,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::LineUserId.eq(line_user_id))
            .filter(Column::Id.ne(user_id))
            .exec(&txn)
            .await?;

        let result = Users::update_many()
            .col_expr(
                Column::LineUserId,
                sea_orm::sea_query::Expr::value(line_user_id.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| StudioError::database_operation(format!("绑定 LINE 账号失败: {e}")))?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn unlink_line_account_impl(&self, line_user_id: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let result = Users::update_many()
            .col_expr(
                Column::LineUserId,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::LineUserId.eq(line_user_id))
            .exec(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("解除 LINE 绑定失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
