//! 业务事件通知
//!
//! 站内通知直接写入收件箱，LINE 消息渲染模板后进入推送队列，由定时任务发送。
//! 这里的方法都是附带效果：失败只记录 warn，不影响主流程。

use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::StudioConfig;
use crate::errors::Result;
use crate::models::bookings::entities::Booking;
use crate::models::notifications::{
    entities::{InAppNotificationType, Notification, ReferenceType},
    requests::{NewInAppNotification, NewNotification},
};
use crate::models::package_requests::entities::PackageRequest;
use crate::models::packages::entities::{Package, PackageAdjustment};
use crate::models::templates::entities as templates;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::models::users::requests::UserListQuery;
use crate::storage::Storage;
use crate::utils::template::render_template;
use crate::utils::time::{format_local, studio_offset};

type Vars = HashMap<&'static str, String>;

fn log_failure<T>(what: &str, result: Result<T>) {
    if let Err(e) = result {
        warn!("Failed to send {} notification: {}", what, e);
    }
}

#[derive(Clone)]
pub struct Notifier {
    storage: Arc<dyn Storage>,
    offset: FixedOffset,
    studio_name: String,
}

impl Notifier {
    pub fn new(storage: Arc<dyn Storage>, studio: &StudioConfig) -> Self {
        Self {
            storage,
            offset: studio_offset(studio.utc_offset_minutes),
            studio_name: studio.name.clone(),
        }
    }

    /// 渲染模板，模板不存在或已停用时返回 None
    pub async fn render(&self, key: &str, vars: &Vars) -> Result<Option<String>> {
        let template = match self.storage.get_message_template(key).await? {
            Some(t) if t.is_active => t,
            _ => {
                debug!("Template {} is missing or inactive", key);
                return Ok(None);
            }
        };
        let mut vars = vars.clone();
        vars.entry("studio").or_insert_with(|| self.studio_name.clone());
        Ok(Some(render_template(&template.content, &vars)))
    }

    /// 渲染并排入 LINE 推送队列
    pub async fn queue_line(
        &self,
        user_id: i64,
        key: &str,
        vars: &Vars,
        scheduled_at: DateTime<Utc>,
        reference: Option<(ReferenceType, i64)>,
    ) -> Result<Option<Notification>> {
        let Some(content) = self.render(key, vars).await? else {
            return Ok(None);
        };
        let queued = self
            .storage
            .enqueue_notification(NewNotification {
                user_id,
                template_key: key.to_string(),
                content,
                scheduled_at,
                reference_type: reference.map(|(t, _)| t),
                reference_id: reference.map(|(_, id)| id),
            })
            .await?;
        Ok(Some(queued))
    }

    async fn in_app(
        &self,
        user_id: i64,
        notification_type: InAppNotificationType,
        title: String,
        content: Option<String>,
        reference: (ReferenceType, i64),
    ) -> Result<()> {
        self.storage
            .create_in_app_notification(NewInAppNotification {
                user_id,
                notification_type,
                title,
                content,
                reference_type: Some(reference.0),
                reference_id: Some(reference.1),
            })
            .await?;
        Ok(())
    }

    async fn display_name(&self, user_id: i64) -> String {
        match self.storage.get_user_by_id(user_id).await {
            Ok(Some(user)) => user.display_name,
            _ => format!("#{user_id}"),
        }
    }

    pub fn format_time(&self, at: DateTime<Utc>) -> String {
        format_local(at, self.offset)
    }

    /// 预约类模板的公共变量
    pub async fn booking_vars(&self, booking: &Booking) -> Vars {
        HashMap::from([
            ("name", self.display_name(booking.customer_id).await),
            ("teacher", self.display_name(booking.teacher_id).await),
            ("session_type", booking.session_type.to_string()),
            ("start_time", self.format_time(booking.start_time)),
        ])
    }

    pub async fn booking_created(&self, booking: &Booking, package: Option<&Package>) {
        let reference = (ReferenceType::Booking, booking.id);
        let mut vars = self.booking_vars(booking).await;
        vars.insert(
            "remaining",
            package
                .map(|p| p.remaining_sessions.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );

        log_failure(
            "booking_created (teacher)",
            self.in_app(
                booking.teacher_id,
                InAppNotificationType::BookingCreated,
                format!("New {} booking on {}", booking.session_type, vars["start_time"]),
                Some(format!("Customer: {}", vars["name"])),
                reference,
            )
            .await,
        );
        log_failure(
            "booking_created (LINE)",
            self.queue_line(
                booking.customer_id,
                templates::BOOKING_CREATED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }

    pub async fn booking_confirmed(&self, booking: &Booking) {
        let reference = (ReferenceType::Booking, booking.id);
        let vars = self.booking_vars(booking).await;

        log_failure(
            "booking_confirmed",
            self.in_app(
                booking.customer_id,
                InAppNotificationType::BookingConfirmed,
                format!("Your session on {} is confirmed", vars["start_time"]),
                Some(format!("Teacher: {}", vars["teacher"])),
                reference,
            )
            .await,
        );
        log_failure(
            "booking_confirmed (LINE)",
            self.queue_line(
                booking.customer_id,
                templates::BOOKING_CONFIRMED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }

    /// 通知取消操作者以外的相关方
    pub async fn booking_cancelled(&self, booking: &Booking, cancelled_by: &User) {
        let reference = (ReferenceType::Booking, booking.id);
        let mut vars = self.booking_vars(booking).await;
        vars.insert(
            "reason",
            booking
                .cancel_reason
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        );
        vars.insert(
            "refunded",
            if booking.session_refunded { "yes" } else { "no" }.to_string(),
        );

        let title = format!("Session on {} was cancelled", vars["start_time"]);
        for recipient in [booking.customer_id, booking.teacher_id] {
            if recipient == cancelled_by.id {
                continue;
            }
            log_failure(
                "booking_cancelled",
                self.in_app(
                    recipient,
                    InAppNotificationType::BookingCancelled,
                    title.clone(),
                    booking.cancel_reason.clone(),
                    reference,
                )
                .await,
            );
        }
        log_failure(
            "booking_cancelled (LINE)",
            self.queue_line(
                booking.customer_id,
                templates::BOOKING_CANCELLED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }

    pub async fn booking_completed(&self, booking: &Booking) {
        log_failure(
            "booking_completed",
            self.in_app(
                booking.customer_id,
                InAppNotificationType::BookingCompleted,
                format!(
                    "Session on {} completed",
                    self.format_time(booking.start_time)
                ),
                None,
                (ReferenceType::Booking, booking.id),
            )
            .await,
        );
    }

    /// 提醒由定时任务调用，失败需要返回给调用方以便下次重试
    pub async fn booking_reminder(&self, booking: &Booking, key: &str) -> Result<Option<Notification>> {
        let vars = self.booking_vars(booking).await;
        self.queue_line(
            booking.customer_id,
            key,
            &vars,
            Utc::now(),
            Some((ReferenceType::Booking, booking.id)),
        )
        .await
    }

    pub async fn package_request_submitted(&self, request: &PackageRequest) {
        let query = UserListQuery {
            size: Some(100),
            role: Some(UserRole::Admin),
            status: Some(UserStatus::Active),
            ..Default::default()
        };
        let admins = match self.storage.list_users_with_pagination(query).await {
            Ok(list) => list.items,
            Err(e) => {
                warn!("Failed to load admins for package request #{}: {}", request.id, e);
                return;
            }
        };
        let customer = self.display_name(request.customer_id).await;
        for admin in admins {
            log_failure(
                "package_request_submitted",
                self.in_app(
                    admin.id,
                    InAppNotificationType::PackageRequestSubmitted,
                    format!(
                        "{} requested a {}-session {} package",
                        customer, request.total_sessions, request.session_type
                    ),
                    request.payment_reference.clone(),
                    (ReferenceType::PackageRequest, request.id),
                )
                .await,
            );
        }
    }

    fn package_vars(&self, name: String, package: &Package) -> Vars {
        HashMap::from([
            ("name", name),
            ("session_type", package.session_type.to_string()),
            ("sessions", package.total_sessions.to_string()),
            ("remaining", package.remaining_sessions.to_string()),
            ("expiry_date", self.format_time(package.expiry_date)),
        ])
    }

    pub async fn package_approved(&self, request: &PackageRequest, package: &Package) {
        let name = self.display_name(request.customer_id).await;
        let vars = self.package_vars(name, package);
        let reference = (ReferenceType::Package, package.id);

        log_failure(
            "package_approved",
            self.in_app(
                request.customer_id,
                InAppNotificationType::PackageApproved,
                format!("Your {} package is active", package.session_type),
                Some(format!("Valid until {}", vars["expiry_date"])),
                reference,
            )
            .await,
        );
        log_failure(
            "package_approved (LINE)",
            self.queue_line(
                request.customer_id,
                templates::PACKAGE_APPROVED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }

    pub async fn package_rejected(&self, request: &PackageRequest) {
        let reference = (ReferenceType::PackageRequest, request.id);
        let vars = HashMap::from([
            ("name", self.display_name(request.customer_id).await),
            (
                "review_note",
                request.review_note.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ]);

        log_failure(
            "package_rejected",
            self.in_app(
                request.customer_id,
                InAppNotificationType::PackageRejected,
                "Your package request was not approved".to_string(),
                request.review_note.clone(),
                reference,
            )
            .await,
        );
        log_failure(
            "package_rejected (LINE)",
            self.queue_line(
                request.customer_id,
                templates::PACKAGE_REJECTED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }

    pub async fn package_adjusted(&self, package: &Package, adjustment: &PackageAdjustment) {
        log_failure(
            "package_adjusted",
            self.in_app(
                package.customer_id,
                InAppNotificationType::PackageAdjusted,
                format!(
                    "Your {} package now has {} sessions left",
                    package.session_type, package.remaining_sessions
                ),
                Some(adjustment.reason.clone()),
                (ReferenceType::Package, package.id),
            )
            .await,
        );
    }

    pub async fn package_expired(&self, package: &Package) {
        let name = self.display_name(package.customer_id).await;
        let vars = self.package_vars(name, package);
        let reference = (ReferenceType::Package, package.id);

        log_failure(
            "package_expired",
            self.in_app(
                package.customer_id,
                InAppNotificationType::PackageExpired,
                format!("Your {} package has expired", package.session_type),
                Some(format!("{} unused sessions", package.remaining_sessions)),
                reference,
            )
            .await,
        );
        log_failure(
            "package_expired (LINE)",
            self.queue_line(
                package.customer_id,
                templates::PACKAGE_EXPIRED,
                &vars,
                Utc::now(),
                Some(reference),
            )
            .await,
        );
    }
}
