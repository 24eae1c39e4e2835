use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（顾客/教师同时创建资料行）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn get_user_by_line_id(&self, line_user_id: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
    // 绑定 LINE 账号（同一 LINE ID 只能绑定一个用户）
    async fn link_line_account(&self, user_id: i64, line_user_id: &str) -> Result<bool>;
    // 按 LINE ID 解除绑定
    async fn unlink_line_account(&self, line_user_id: &str) -> Result<bool>;

    /// 顾客资料
    async fn get_customer(&self, user_id: i64) -> Result<Option<Customer>>;
    async fn list_customers_with_pagination(
        &self,
        query: CustomerListQuery,
    ) -> Result<CustomerListResponse>;
    async fn update_customer(
        &self,
        user_id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>>;

    /// 教师资料
    async fn get_teacher(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn update_teacher(
        &self,
        user_id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;

    /// 课程包
    // 创建课程包，可同时写入一条财务流水
    async fn create_package(
        &self,
        package: NewPackage,
        payment: Option<NewPayment>,
    ) -> Result<(Package, Option<PaymentReport>)>;
    async fn get_package_by_id(&self, id: i64) -> Result<Option<Package>>;
    async fn list_packages_with_pagination(
        &self,
        query: PackageListQuery,
    ) -> Result<PackageListResponse>;
    // 顾客某类型的有效课程包
    async fn list_active_packages(
        &self,
        customer_id: i64,
        session_type: SessionType,
    ) -> Result<Vec<Package>>;
    async fn adjust_package(
        &self,
        package_id: i64,
        plan: AdjustmentPlan,
        adjusted_by: i64,
    ) -> Result<Option<(Package, PackageAdjustment)>>;
    async fn list_package_adjustments(&self, package_id: i64) -> Result<Vec<PackageAdjustment>>;
    // 将到期的有效课程包置为 expired，返回被更新的课程包
    async fn expire_packages(&self, now: DateTime<Utc>) -> Result<Vec<Package>>;
    // 有效课程包剩余课时总数
    async fn count_outstanding_sessions(&self) -> Result<i64>;
    async fn count_packages_created(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64>;

    /// 购买申请
    async fn create_package_request(
        &self,
        customer_id: i64,
        request: SubmitPackageRequest,
    ) -> Result<PackageRequest>;
    async fn get_package_request_by_id(&self, id: i64) -> Result<Option<PackageRequest>>;
    async fn list_package_requests_with_pagination(
        &self,
        query: PackageRequestListQuery,
    ) -> Result<PackageRequestListResponse>;
    // 批准：事务内创建课程包，金额为正时写入流水
    async fn approve_package_request(
        &self,
        id: i64,
        reviewer_id: i64,
        review_note: Option<String>,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<(PackageRequest, Package, Option<PaymentReport>)>>;
    // 仅 pending 状态可迁移到 rejected / cancelled
    async fn close_package_request(
        &self,
        id: i64,
        status: PackageRequestStatus,
        reviewer_id: Option<i64>,
        review_note: Option<String>,
    ) -> Result<Option<PackageRequest>>;

    /// 预约
    // 事务内判定时段、扣减课时并写入预约
    async fn create_booking(
        &self,
        booking: NewBooking,
        rules: StudioRules,
        now: DateTime<Utc>,
    ) -> Result<BookingCreation>;
    async fn get_booking_by_id(&self, id: i64) -> Result<Option<Booking>>;
    async fn list_bookings_with_pagination(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse>;
    // 与时间范围相交的预约（教师或顾客任一匹配）
    async fn list_bookings_in_range(
        &self,
        teacher_id: Option<i64>,
        customer_id: Option<i64>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<Booking>>;
    async fn update_booking_status(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>>;
    // 取消并按需退还课时，返回预约与退还后的课程包
    async fn cancel_booking(
        &self,
        cancel: CancelBooking,
    ) -> Result<Option<(Booking, Option<Package>)>>;
    // 即将开始、尚有提醒未发送的已确认预约
    async fn list_bookings_for_reminders(
        &self,
        now: DateTime<Utc>,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<Booking>>;
    async fn mark_reminders_sent(&self, id: i64, reminder_24h: bool, reminder_6h: bool)
    -> Result<bool>;

    /// 教师封锁时段
    async fn create_teacher_block(&self, block: NewTeacherBlock) -> Result<TeacherBlock>;
    async fn get_teacher_block(&self, id: i64) -> Result<Option<TeacherBlock>>;
    // 可能与时间范围相交的封锁（周期封锁按起止日期粗筛）
    async fn list_teacher_blocks(
        &self,
        teacher_id: Option<i64>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<TeacherBlock>>;
    async fn delete_teacher_block(&self, id: i64) -> Result<bool>;

    /// 财务流水
    async fn create_payment(&self, payment: NewPayment) -> Result<PaymentReport>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse>;
    async fn list_payments_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PaymentReport>>;

    /// LINE 推送队列
    async fn enqueue_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Notification>>;
    async fn record_notification_attempt(
        &self,
        id: i64,
        status: NotificationStatus,
        attempts: i32,
        last_error: Option<String>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<bool>;

    /// 站内通知
    async fn create_in_app_notification(
        &self,
        notification: NewInAppNotification,
    ) -> Result<InAppNotification>;
    async fn list_in_app_notifications(
        &self,
        user_id: i64,
        page: Option<i64>,
        size: Option<i64>,
        unread_only: bool,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64>;

    /// 消息模板
    async fn list_message_templates(&self) -> Result<Vec<MessageTemplate>>;
    async fn get_message_template(&self, key: &str) -> Result<Option<MessageTemplate>>;
    async fn update_message_template(
        &self,
        key: &str,
        update: UpdateTemplateRequest,
    ) -> Result<Option<MessageTemplate>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
