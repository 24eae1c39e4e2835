//! 基于内存 SQLite 的存储层流程测试

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;

use pilates_studio::config::{LineConfig, StudioConfig};
use pilates_studio::errors::StudioError;
use pilates_studio::line::LineClient;
use pilates_studio::models::bookings::entities::{BlockType, BookingCreation, BookingStatus};
use pilates_studio::models::bookings::requests::{CancelBooking, NewBooking, NewTeacherBlock};
use pilates_studio::models::notifications::entities::NotificationStatus;
use pilates_studio::models::notifications::requests::NewNotification;
use pilates_studio::models::package_requests::entities::PackageRequestStatus;
use pilates_studio::models::package_requests::requests::SubmitPackageRequest;
use pilates_studio::models::packages::entities::{
    Package, PackageStatus, SessionType, plan_adjustment,
};
use pilates_studio::models::packages::requests::NewPackage;
use pilates_studio::models::payments::entities::PaymentMethod;
use pilates_studio::models::templates::entities::{REMINDER_6H, REMINDER_24H};
use pilates_studio::models::users::entities::{User, UserRole};
use pilates_studio::models::users::requests::CreateUserRequest;
use pilates_studio::scheduling::{BlockReason, StudioRules};
use pilates_studio::services::Notifier;
use pilates_studio::storage::Storage;
use pilates_studio::storage::sea_orm_storage::SeaOrmStorage;
use pilates_studio::worker::{dispatch, expiry, reminders};

async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // 内存库每个连接各自独立，只能用单连接
    opt.max_connections(1).min_connections(1);
    Database::connect(opt).await.unwrap()
}

async fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::from_connection(memory_db().await).await.unwrap())
}

async fn user(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@studio.test"),
            password: "hash".to_string(),
            role,
            display_name: None,
            phone: None,
        })
        .await
        .unwrap()
}

async fn package(
    storage: &Arc<dyn Storage>,
    customer_id: i64,
    sessions: i32,
    now: DateTime<Utc>,
) -> Package {
    let (package, payment) = storage
        .create_package(
            NewPackage {
                customer_id,
                session_type: SessionType::Private,
                total_sessions: sessions,
                price: 0.0,
                start_date: now - Duration::days(1),
                expiry_date: now + Duration::days(30),
                source_request_id: None,
            },
            None,
        )
        .await
        .unwrap();
    assert!(payment.is_none());
    package
}

fn rules() -> StudioRules {
    StudioRules::from(&StudioConfig::default())
}

/// `days` 天后当地时间 `hour` 点整
fn local_slot(now: DateTime<Utc>, days: i64, hour: u32) -> DateTime<Utc> {
    let offset = FixedOffset::east_opt(StudioConfig::default().utc_offset_minutes * 60).unwrap();
    let date = now.with_timezone(&offset).date_naive() + Duration::days(days);
    offset
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

/// 让 `start` 落在当地中午的营业规则
fn rules_around(start: DateTime<Utc>) -> StudioRules {
    let secs_into_day = start.num_seconds_from_midnight() as i32;
    let offset = FixedOffset::east_opt(12 * 3600 - secs_into_day).unwrap();
    StudioRules { offset, ..rules() }
}

fn submit(sessions: i32, validity_days: i64, price: f64) -> SubmitPackageRequest {
    SubmitPackageRequest {
        session_type: SessionType::Group,
        total_sessions: sessions,
        validity_days,
        price,
        payment_reference: Some("TX-001".to_string()),
        note: None,
    }
}

fn new_booking(customer: &User, teacher: &User, package: &Package, start: DateTime<Utc>) -> NewBooking {
    NewBooking {
        customer_id: customer.id,
        teacher_id: teacher.id,
        package_id: Some(package.id),
        session_type: SessionType::Private,
        start_time: start,
        end_time: start + Duration::hours(1),
        status: BookingStatus::Pending,
        note: None,
    }
}

fn created(result: BookingCreation) -> (pilates_studio::models::bookings::entities::Booking, Package) {
    match result {
        BookingCreation::Created {
            booking,
            package: Some(package),
        } => (booking, package),
        other => panic!("expected booking to be created, got {other:?}"),
    }
}

#[tokio::test]
async fn test_booking_deducts_and_refunds_session() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "alice", UserRole::Customer).await;
    let teacher = user(&storage, "tom", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 2, now).await;

    let start = local_slot(now, 2, 10);
    let (booking, after_booking) = created(
        storage
            .create_booking(new_booking(&customer, &teacher, &pkg, start), rules(), now)
            .await
            .unwrap(),
    );
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(after_booking.remaining_sessions, 1);

    let (cancelled, refunded) = storage
        .cancel_booking(CancelBooking {
            booking_id: booking.id,
            cancelled_by: customer.id,
            reason: Some("sick".to_string()),
            refund: true,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.session_refunded);
    assert_eq!(refunded.unwrap().remaining_sessions, 2);

    // 已取消的预约不能再次取消
    assert!(
        storage
            .cancel_booking(CancelBooking {
                booking_id: booking.id,
                cancelled_by: customer.id,
                reason: None,
                refund: true,
            })
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_cancel_without_refund_keeps_package() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "bella", UserRole::Customer).await;
    let teacher = user(&storage, "tina", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 3, now).await;

    let (booking, _) = created(
        storage
            .create_booking(
                new_booking(&customer, &teacher, &pkg, local_slot(now, 3, 9)),
                rules(),
                now,
            )
            .await
            .unwrap(),
    );
    let (cancelled, refunded) = storage
        .cancel_booking(CancelBooking {
            booking_id: booking.id,
            cancelled_by: customer.id,
            reason: None,
            refund: false,
        })
        .await
        .unwrap()
        .unwrap();
    assert!(!cancelled.session_refunded);
    assert!(refunded.is_none());

    let reloaded = storage.get_package_by_id(pkg.id).await.unwrap().unwrap();
    assert_eq!(reloaded.remaining_sessions, 2);
}

#[tokio::test]
async fn test_last_session_marks_package_used() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "cara", UserRole::Customer).await;
    let teacher = user(&storage, "theo", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 1, now).await;

    let (_, after) = created(
        storage
            .create_booking(
                new_booking(&customer, &teacher, &pkg, local_slot(now, 2, 11)),
                rules(),
                now,
            )
            .await
            .unwrap(),
    );
    assert_eq!(after.remaining_sessions, 0);
    assert_eq!(after.status, PackageStatus::Used);

    let second = storage
        .create_booking(
            new_booking(&customer, &teacher, &pkg, local_slot(now, 2, 13)),
            rules(),
            now,
        )
        .await
        .unwrap();
    assert!(matches!(second, BookingCreation::PackageUnavailable));
}

#[tokio::test]
async fn test_slot_conflicts_are_rejected() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "dana", UserRole::Customer).await;
    let other = user(&storage, "erin", UserRole::Customer).await;
    let teacher = user(&storage, "tess", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 5, now).await;
    let other_pkg = package(&storage, other.id, 5, now).await;

    let start = local_slot(now, 4, 15);
    created(
        storage
            .create_booking(new_booking(&customer, &teacher, &pkg, start), rules(), now)
            .await
            .unwrap(),
    );

    // 私教课已占用该时段
    let taken = storage
        .create_booking(new_booking(&other, &teacher, &other_pkg, start), rules(), now)
        .await
        .unwrap();
    assert!(matches!(
        taken,
        BookingCreation::SlotUnavailable(BlockReason::PrivateSession)
    ));

    // 顾客自己的时间冲突
    let clash = storage
        .create_booking(new_booking(&customer, &teacher, &pkg, start), rules(), now)
        .await
        .unwrap();
    assert!(matches!(
        clash,
        BookingCreation::SlotUnavailable(BlockReason::CustomerConflict)
    ));

    // 失败的尝试不扣课时
    let reloaded = storage.get_package_by_id(pkg.id).await.unwrap().unwrap();
    assert_eq!(reloaded.remaining_sessions, 4);
}

#[tokio::test]
async fn test_teacher_block_prevents_booking() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "fay", UserRole::Customer).await;
    let teacher = user(&storage, "toby", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 2, now).await;

    let start = local_slot(now, 5, 10);
    storage
        .create_teacher_block(NewTeacherBlock {
            teacher_id: teacher.id,
            block_type: BlockType::Single,
            start_time: start - Duration::hours(1),
            end_time: start + Duration::hours(2),
            recurrence_days: vec![],
            recurrence_until: None,
            reason: Some("workshop".to_string()),
            created_by: teacher.id,
        })
        .await
        .unwrap();

    let result = storage
        .create_booking(new_booking(&customer, &teacher, &pkg, start), rules(), now)
        .await
        .unwrap();
    assert!(matches!(
        result,
        BookingCreation::SlotUnavailable(BlockReason::TeacherBlocked)
    ));
}

#[tokio::test]
async fn test_confirm_only_from_pending() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "gina", UserRole::Customer).await;
    let teacher = user(&storage, "tara", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 2, now).await;

    let (booking, _) = created(
        storage
            .create_booking(
                new_booking(&customer, &teacher, &pkg, local_slot(now, 2, 16)),
                rules(),
                now,
            )
            .await
            .unwrap(),
    );
    let confirmed = storage
        .update_booking_status(booking.id, BookingStatus::Pending, BookingStatus::Confirmed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let again = storage
        .update_booking_status(booking.id, BookingStatus::Pending, BookingStatus::Confirmed)
        .await;
    assert!(!matches!(again, Ok(Some(_))));
}

#[tokio::test]
async fn test_expire_packages() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "hana", UserRole::Customer).await;
    let short = package(&storage, customer.id, 5, now).await;
    let (long, _) = storage
        .create_package(
            NewPackage {
                customer_id: customer.id,
                session_type: SessionType::Group,
                total_sessions: 10,
                price: 0.0,
                start_date: now,
                expiry_date: now + Duration::days(90),
                source_request_id: None,
            },
            None,
        )
        .await
        .unwrap();

    // 创建时即已过期的课程包直接是 expired
    let (born_expired, _) = storage
        .create_package(
            NewPackage {
                customer_id: customer.id,
                session_type: SessionType::Duo,
                total_sessions: 4,
                price: 0.0,
                start_date: now - Duration::days(40),
                expiry_date: now - Duration::days(1),
                source_request_id: None,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(born_expired.status, PackageStatus::Expired);

    let expired = storage
        .expire_packages(now + Duration::days(31))
        .await
        .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, short.id);
    assert_eq!(expired[0].status, PackageStatus::Expired);

    let long = storage.get_package_by_id(long.id).await.unwrap().unwrap();
    assert_eq!(long.status, PackageStatus::Active);

    // 顾客收到站内通知
    let notifier = Notifier::new(storage.clone(), &StudioConfig::default());
    notifier.package_expired(&expired[0]).await;
    assert_eq!(storage.count_unread_notifications(customer.id).await.unwrap(), 1);

    // 以当前时间运行定时任务没有新的过期
    assert_eq!(expiry::expire_packages(&storage, &notifier).await.unwrap(), 0);
}

#[tokio::test]
async fn test_dispatch_skips_without_line_account() {
    let storage = memory_storage().await;
    let customer = user(&storage, "iris", UserRole::Customer).await;
    storage
        .enqueue_notification(NewNotification {
            user_id: customer.id,
            template_key: "booking_created".to_string(),
            content: "See you soon".to_string(),
            scheduled_at: Utc::now() - Duration::minutes(1),
            reference_type: None,
            reference_id: None,
        })
        .await
        .unwrap();

    let _ = rustls::crypto::ring::default_provider().install_default();
    let client = LineClient::new(&LineConfig::default()).unwrap();
    let sent = dispatch::dispatch_notifications(&storage, &client, 10, 3)
        .await
        .unwrap();
    assert_eq!(sent, 0);

    // 已标记为 skipped，不再出现在待发送队列中
    let due = storage.list_due_notifications(Utc::now(), 10).await.unwrap();
    assert!(due.is_empty());
}

#[tokio::test]
async fn test_future_notifications_are_not_due() {
    let storage = memory_storage().await;
    let customer = user(&storage, "jade", UserRole::Customer).await;
    let queued = storage
        .enqueue_notification(NewNotification {
            user_id: customer.id,
            template_key: "reminder_24h".to_string(),
            content: "Tomorrow".to_string(),
            scheduled_at: Utc::now() + Duration::hours(1),
            reference_type: None,
            reference_id: None,
        })
        .await
        .unwrap();
    assert_eq!(queued.status, NotificationStatus::Pending);
    assert!(
        storage
            .list_due_notifications(Utc::now(), 10)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_refund_is_not_recorded_when_package_is_full() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "kira", UserRole::Customer).await;
    let teacher = user(&storage, "tad", UserRole::Teacher).await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let pkg = package(&storage, customer.id, 2, now).await;

    let (booking, after_booking) = created(
        storage
            .create_booking(
                new_booking(&customer, &teacher, &pkg, local_slot(now, 2, 14)),
                rules(),
                now,
            )
            .await
            .unwrap(),
    );

    // 管理员先把课时补回满额
    let plan = plan_adjustment(&after_booking, Some(1), None, Some("goodwill"), now).unwrap();
    storage
        .adjust_package(pkg.id, plan, admin.id)
        .await
        .unwrap()
        .unwrap();

    let (cancelled, _) = storage
        .cancel_booking(CancelBooking {
            booking_id: booking.id,
            cancelled_by: admin.id,
            reason: None,
            refund: true,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(!cancelled.session_refunded);

    let reloaded = storage.get_package_by_id(pkg.id).await.unwrap().unwrap();
    assert_eq!(reloaded.remaining_sessions, 2);
}

#[tokio::test]
async fn test_approve_package_request() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "lena", UserRole::Customer).await;
    let admin = user(&storage, "admin", UserRole::Admin).await;

    let request = storage
        .create_package_request(customer.id, submit(10, 60, 1200.0))
        .await
        .unwrap();
    assert_eq!(request.status, PackageRequestStatus::Pending);

    let (approved, pkg, payment) = storage
        .approve_package_request(
            request.id,
            admin.id,
            Some("paid".to_string()),
            PaymentMethod::Transfer,
            now,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, PackageRequestStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(admin.id));
    assert_eq!(approved.review_note.as_deref(), Some("paid"));
    assert_eq!(approved.package_id, Some(pkg.id));

    // 有效期从批准时开始计算
    assert_eq!(pkg.customer_id, customer.id);
    assert_eq!(pkg.remaining_sessions, 10);
    assert_eq!(pkg.status, PackageStatus::Active);
    assert_eq!(pkg.source_request_id, Some(request.id));
    assert_eq!(pkg.start_date.timestamp(), now.timestamp());
    assert_eq!(
        pkg.expiry_date.timestamp(),
        (now + Duration::days(60)).timestamp()
    );

    let payment = payment.unwrap();
    assert_eq!(payment.amount, 1200.0);
    assert_eq!(payment.package_id, Some(pkg.id));
    assert_eq!(payment.reference.as_deref(), Some("TX-001"));

    let reloaded = storage
        .get_package_request_by_id(request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.package_id, Some(pkg.id));

    // 重复批准不会再创建课程包或流水
    let again = storage
        .approve_package_request(request.id, admin.id, None, PaymentMethod::Cash, now)
        .await;
    assert!(matches!(again, Err(StudioError::InvalidTransition(_))));
    assert_eq!(
        storage.list_payments_in_range(None, None).await.unwrap().len(),
        1
    );
    let rejected = storage
        .close_package_request(
            request.id,
            PackageRequestStatus::Rejected,
            Some(admin.id),
            Some("late".to_string()),
        )
        .await;
    assert!(matches!(rejected, Err(StudioError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_approve_free_package_request_writes_no_payment() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "maya", UserRole::Customer).await;
    let admin = user(&storage, "admin", UserRole::Admin).await;

    let request = storage
        .create_package_request(customer.id, submit(1, 14, 0.0))
        .await
        .unwrap();
    let (approved, pkg, payment) = storage
        .approve_package_request(request.id, admin.id, None, PaymentMethod::Transfer, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.package_id, Some(pkg.id));
    assert!(payment.is_none());
    assert!(
        storage
            .list_payments_in_range(None, None)
            .await
            .unwrap()
            .is_empty()
    );

    assert!(
        storage
            .approve_package_request(9999, admin.id, None, PaymentMethod::Transfer, now)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_adjust_package_records_audit_and_status() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "nina", UserRole::Customer).await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let pkg = package(&storage, customer.id, 5, now).await;

    let plan = plan_adjustment(&pkg, Some(-5), None, Some("moved to cash refund"), now).unwrap();
    let (used, adjustment) = storage
        .adjust_package(pkg.id, plan, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(used.remaining_sessions, 0);
    assert_eq!(used.status, PackageStatus::Used);
    assert_eq!(adjustment.sessions_delta, -5);
    assert_eq!(adjustment.remaining_before, 5);
    assert_eq!(adjustment.remaining_after, 0);
    assert_eq!(adjustment.adjusted_by, admin.id);
    assert_eq!(adjustment.reason, "moved to cash refund");

    // 补回课时但到期日已过，状态为 expired
    let expiry = now - Duration::hours(1);
    let plan = plan_adjustment(&used, Some(2), Some(expiry), Some("late top-up"), now).unwrap();
    let (expired, _) = storage
        .adjust_package(pkg.id, plan, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(expired.remaining_sessions, 2);
    assert_eq!(expired.status, PackageStatus::Expired);
    assert_eq!(expired.expiry_date.timestamp(), expiry.timestamp());

    let reloaded = storage.get_package_by_id(pkg.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, PackageStatus::Expired);

    let history = storage.list_package_adjustments(pkg.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|a| a.remaining_before == 0 && a.remaining_after == 2));
}

#[tokio::test]
async fn test_create_reminders_queues_once() {
    let storage = memory_storage().await;
    let now = Utc::now();
    let customer = user(&storage, "olga", UserRole::Customer).await;
    let teacher = user(&storage, "tim", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 5, now).await;

    let soon = now + Duration::hours(3);
    let tomorrow = now + Duration::hours(20);
    let mut booked = Vec::new();
    for start in [soon, tomorrow] {
        let (booking, _) = created(
            storage
                .create_booking(
                    NewBooking {
                        status: BookingStatus::Confirmed,
                        ..new_booking(&customer, &teacher, &pkg, start)
                    },
                    rules_around(start),
                    now,
                )
                .await
                .unwrap(),
        );
        booked.push(booking);
    }

    let notifier = Notifier::new(storage.clone(), &StudioConfig::default());
    assert_eq!(reminders::create_reminders(&storage, &notifier).await.unwrap(), 2);

    let queued = storage
        .list_due_notifications(Utc::now() + Duration::minutes(1), 10)
        .await
        .unwrap();
    assert_eq!(queued.len(), 2);
    assert!(queued.iter().all(|n| n.user_id == customer.id));
    assert!(queued.iter().any(|n| n.template_key == REMINDER_6H));
    assert!(queued.iter().any(|n| n.template_key == REMINDER_24H));

    let soon = storage.get_booking_by_id(booked[0].id).await.unwrap().unwrap();
    assert!(soon.reminder_24h_sent && soon.reminder_6h_sent);
    let tomorrow = storage.get_booking_by_id(booked[1].id).await.unwrap().unwrap();
    assert!(tomorrow.reminder_24h_sent && !tomorrow.reminder_6h_sent);

    // 标记已写入，再次扫描不会重复排队
    assert_eq!(reminders::create_reminders(&storage, &notifier).await.unwrap(), 0);
    assert_eq!(
        storage
            .list_due_notifications(Utc::now() + Duration::minutes(1), 10)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_reminder_flag_failure_does_not_stop_scan() {
    let db = memory_db().await;
    let storage: Arc<dyn Storage> =
        Arc::new(SeaOrmStorage::from_connection(db.clone()).await.unwrap());
    let now = Utc::now();
    let customer = user(&storage, "pia", UserRole::Customer).await;
    let teacher = user(&storage, "ted", UserRole::Teacher).await;
    let pkg = package(&storage, customer.id, 5, now).await;

    let mut booked = Vec::new();
    for start in [now + Duration::hours(3), now + Duration::hours(20)] {
        let (booking, _) = created(
            storage
                .create_booking(
                    NewBooking {
                        status: BookingStatus::Confirmed,
                        ..new_booking(&customer, &teacher, &pkg, start)
                    },
                    rules_around(start),
                    now,
                )
                .await
                .unwrap(),
        );
        booked.push(booking);
    }

    // 第一个预约的提醒标记写入失败
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_reminder_flags BEFORE UPDATE OF reminder_6h_sent ON bookings \
         WHEN OLD.id = {} BEGIN SELECT RAISE(ABORT, 'flags locked'); END",
        booked[0].id
    ))
    .await
    .unwrap();

    let notifier = Notifier::new(storage.clone(), &StudioConfig::default());
    assert_eq!(reminders::create_reminders(&storage, &notifier).await.unwrap(), 2);

    let first = storage.get_booking_by_id(booked[0].id).await.unwrap().unwrap();
    assert!(!first.reminder_6h_sent);
    let second = storage.get_booking_by_id(booked[1].id).await.unwrap().unwrap();
    assert!(second.reminder_24h_sent);
}
