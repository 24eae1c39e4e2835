//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod blocks;
mod bookings;
mod customers;
mod notifications;
mod package_requests;
mod packages;
mod payments;
mod teachers;
mod templates;
mod users;

use crate::config::AppConfig;
use crate::errors::{StudioError, Result};
use migration::{Migrator, MigratorTrait};
use crate::models::{PaginationInfo, PaginationQuery};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Select};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| StudioError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 基于已有连接创建存储并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| StudioError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| StudioError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| StudioError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| StudioError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 分页查询通用流程：总数、页数、当前页
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: Option<i64>,
        size: Option<i64>,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        let (page, size) = PaginationQuery::normalized(page, size);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| StudioError::database_operation(format!("查询{what}总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| StudioError::database_operation(format!("查询{what}页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询{what}列表失败: {e}")))?;

        Ok((items, PaginationInfo::new(page, size, total, pages)))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(StudioError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    bookings::{
        entities::{Booking, BookingCreation, BookingStatus, TeacherBlock},
        requests::{BookingListQuery, CancelBooking, NewBooking, NewTeacherBlock},
        responses::BookingListResponse,
    },
    customers::{
        entities::Customer,
        requests::{CustomerListQuery, UpdateCustomerRequest},
        responses::CustomerListResponse,
    },
    notifications::{
        entities::{InAppNotification, Notification, NotificationStatus},
        requests::{NewInAppNotification, NewNotification},
        responses::NotificationListResponse,
    },
    package_requests::{
        entities::{PackageRequest, PackageRequestStatus},
        requests::{PackageRequestListQuery, SubmitPackageRequest},
        responses::PackageRequestListResponse,
    },
    packages::{
        entities::{AdjustmentPlan, Package, PackageAdjustment, SessionType},
        requests::{NewPackage, PackageListQuery},
        responses::PackageListResponse,
    },
    payments::{
        entities::{PaymentMethod, PaymentReport},
        requests::{NewPayment, PaymentListQuery},
        responses::PaymentListResponse,
    },
    teachers::{
        entities::Teacher,
        requests::{TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    templates::{entities::MessageTemplate, requests::UpdateTemplateRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::scheduling::StudioRules;
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_user_by_line_id(&self, line_user_id: &str) -> Result<Option<User>> {
        self.get_user_by_line_id_impl(line_user_id).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn link_line_account(&self, user_id: i64, line_user_id: &str) -> Result<bool> {
        self.link_line_account_impl(user_id, line_user_id).await
    }

    async fn unlink_line_account(&self, line_user_id: &str) -> Result<bool> {
        self.unlink_line_account_impl(line_user_id).await
    }

    // 顾客模块
    async fn get_customer(&self, user_id: i64) -> Result<Option<Customer>> {
        self.get_customer_impl(user_id).await
    }

    async fn list_customers_with_pagination(
        &self,
        query: CustomerListQuery,
    ) -> Result<CustomerListResponse> {
        self.list_customers_with_pagination_impl(query).await
    }

    async fn update_customer(
        &self,
        user_id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>> {
        self.update_customer_impl(user_id, update).await
    }

    // 教师模块
    async fn get_teacher(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        user_id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(user_id, update).await
    }

    // 课程包模块
    async fn create_package(
        &self,
        package: NewPackage,
        payment: Option<NewPayment>,
    ) -> Result<(Package, Option<PaymentReport>)> {
        self.create_package_impl(package, payment).await
    }

    async fn get_package_by_id(&self, id: i64) -> Result<Option<Package>> {
        self.get_package_by_id_impl(id).await
    }

    async fn list_packages_with_pagination(
        &self,
        query: PackageListQuery,
    ) -> Result<PackageListResponse> {
        self.list_packages_with_pagination_impl(query).await
    }

    async fn list_active_packages(
        &self,
        customer_id: i64,
        session_type: SessionType,
    ) -> Result<Vec<Package>> {
        self.list_active_packages_impl(customer_id, session_type)
            .await
    }

    async fn adjust_package(
        &self,
        package_id: i64,
        plan: AdjustmentPlan,
        adjusted_by: i64,
    ) -> Result<Option<(Package, PackageAdjustment)>> {
        self.adjust_package_impl(package_id, plan, adjusted_by)
            .await
    }

    async fn list_package_adjustments(&self, package_id: i64) -> Result<Vec<PackageAdjustment>> {
        self.list_package_adjustments_impl(package_id).await
    }

    async fn expire_packages(&self, now: DateTime<Utc>) -> Result<Vec<Package>> {
        self.expire_packages_impl(now).await
    }

    async fn count_outstanding_sessions(&self) -> Result<i64> {
        self.count_outstanding_sessions_impl().await
    }

    async fn count_packages_created(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        self.count_packages_created_impl(from, to).await
    }

    // 购买申请模块
    async fn create_package_request(
        &self,
        customer_id: i64,
        request: SubmitPackageRequest,
    ) -> Result<PackageRequest> {
        self.create_package_request_impl(customer_id, request)
            .await
    }

    async fn get_package_request_by_id(&self, id: i64) -> Result<Option<PackageRequest>> {
        self.get_package_request_by_id_impl(id).await
    }

    async fn list_package_requests_with_pagination(
        &self,
        query: PackageRequestListQuery,
    ) -> Result<PackageRequestListResponse> {
        self.list_package_requests_with_pagination_impl(query)
            .await
    }

    async fn approve_package_request(
        &self,
        id: i64,
        reviewer_id: i64,
        review_note: Option<String>,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<(PackageRequest, Package, Option<PaymentReport>)>> {
        self.approve_package_request_impl(id, reviewer_id, review_note, method, now)
            .await
    }

    async fn close_package_request(
        &self,
        id: i64,
        status: PackageRequestStatus,
        reviewer_id: Option<i64>,
        review_note: Option<String>,
    ) -> Result<Option<PackageRequest>> {
        self.close_package_request_impl(id, status, reviewer_id, review_note)
            .await
    }

    // 预约模块
    async fn create_booking(
        &self,
        booking: NewBooking,
        rules: StudioRules,
        now: DateTime<Utc>,
    ) -> Result<BookingCreation> {
        self.create_booking_impl(booking, rules, now).await
    }

    async fn get_booking_by_id(&self, id: i64) -> Result<Option<Booking>> {
        self.get_booking_by_id_impl(id).await
    }

    async fn list_bookings_with_pagination(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse> {
        self.list_bookings_with_pagination_impl(query).await
    }

    async fn list_bookings_in_range(
        &self,
        teacher_id: Option<i64>,
        customer_id: Option<i64>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<Booking>> {
        self.list_bookings_in_range_impl(teacher_id, customer_id, from, to, active_only)
            .await
    }

    async fn update_booking_status(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>> {
        self.update_booking_status_impl(id, from, to).await
    }

    async fn cancel_booking(
        &self,
        cancel: CancelBooking,
    ) -> Result<Option<(Booking, Option<Package>)>> {
        self.cancel_booking_impl(cancel).await
    }

    async fn list_bookings_for_reminders(
        &self,
        now: DateTime<Utc>,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        self.list_bookings_for_reminders_impl(now, horizon).await
    }

    async fn mark_reminders_sent(
        &self,
        id: i64,
        reminder_24h: bool,
        reminder_6h: bool,
    ) -> Result<bool> {
        self.mark_reminders_sent_impl(id, reminder_24h, reminder_6h)
            .await
    }

    // 封锁模块
    async fn create_teacher_block(&self, block: NewTeacherBlock) -> Result<TeacherBlock> {
        self.create_teacher_block_impl(block).await
    }

    async fn get_teacher_block(&self, id: i64) -> Result<Option<TeacherBlock>> {
        self.get_teacher_block_impl(id).await
    }

    async fn list_teacher_blocks(
        &self,
        teacher_id: Option<i64>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<TeacherBlock>> {
        self.list_teacher_blocks_impl(teacher_id, from, to).await
    }

    async fn delete_teacher_block(&self, id: i64) -> Result<bool> {
        self.delete_teacher_block_impl(id).await
    }

    // 财务模块
    async fn create_payment(&self, payment: NewPayment) -> Result<PaymentReport> {
        self.create_payment_impl(payment).await
    }

    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        self.list_payments_with_pagination_impl(query).await
    }

    async fn list_payments_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PaymentReport>> {
        self.list_payments_in_range_impl(from, to).await
    }

    // 推送队列模块
    async fn enqueue_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.enqueue_notification_impl(notification).await
    }

    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Notification>> {
        self.list_due_notifications_impl(now, limit).await
    }

    async fn record_notification_attempt(
        &self,
        id: i64,
        status: NotificationStatus,
        attempts: i32,
        last_error: Option<String>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        self.record_notification_attempt_impl(id, status, attempts, last_error, sent_at)
            .await
    }

    // 站内通知模块
    async fn create_in_app_notification(
        &self,
        notification: NewInAppNotification,
    ) -> Result<InAppNotification> {
        self.create_in_app_notification_impl(notification).await
    }

    async fn list_in_app_notifications(
        &self,
        user_id: i64,
        page: Option<i64>,
        size: Option<i64>,
        unread_only: bool,
    ) -> Result<NotificationListResponse> {
        self.list_in_app_notifications_impl(user_id, page, size, unread_only)
            .await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool> {
        self.mark_notification_read_impl(user_id, id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    // 模板模块
    async fn list_message_templates(&self) -> Result<Vec<MessageTemplate>> {
        self.list_message_templates_impl().await
    }

    async fn get_message_template(&self, key: &str) -> Result<Option<MessageTemplate>> {
        self.get_message_template_impl(key).await
    }

    async fn update_message_template(
        &self,
        key: &str,
        update: UpdateTemplateRequest,
    ) -> Result<Option<MessageTemplate>> {
        self.update_message_template_impl(key, update).await
    }
}
