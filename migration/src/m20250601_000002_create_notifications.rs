use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== LINE 推送队列 ====================
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::TemplateKey).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::ScheduledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Status).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Notifications::LastError).text().null())
                    .col(ColumnDef::new(Notifications::SentAt).big_integer().null())
                    .col(ColumnDef::new(Notifications::ReferenceType).string().null())
                    .col(ColumnDef::new(Notifications::ReferenceId).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_status_scheduled")
                    .table(Notifications::Table)
                    .col(Notifications::Status)
                    .col(Notifications::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 站内通知 ====================
        manager
            .create_table(
                Table::create()
                    .table(InAppNotifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InAppNotifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InAppNotifications::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InAppNotifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InAppNotifications::Title).string().not_null())
                    .col(ColumnDef::new(InAppNotifications::Content).text().null())
                    .col(
                        ColumnDef::new(InAppNotifications::ReferenceType)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InAppNotifications::ReferenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InAppNotifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(InAppNotifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InAppNotifications::Table, InAppNotifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_in_app_notifications_user_read")
                    .table(InAppNotifications::Table)
                    .col(InAppNotifications::UserId)
                    .col(InAppNotifications::IsRead)
                    .to_owned(),
            )
            .await?;

        // ==================== 消息模板 ====================
        manager
            .create_table(
                Table::create()
                    .table(MessageTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessageTemplates::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MessageTemplates::Content).text().not_null())
                    .col(
                        ColumnDef::new(MessageTemplates::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MessageTemplates::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认模板 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_templates = [
            (
                "booking_created",
                "Hi {name}, your {session_type} session with {teacher} on {start_time} has been booked. Remaining sessions: {remaining}.",
            ),
            (
                "booking_confirmed",
                "Hi {name}, your {session_type} session with {teacher} on {start_time} is confirmed.",
            ),
            (
                "booking_cancelled",
                "Hi {name}, your session with {teacher} on {start_time} was cancelled. Reason: {reason}. Session refunded: {refunded}.",
            ),
            (
                "reminder_24h",
                "Reminder: {name}, you have a {session_type} session with {teacher} tomorrow at {start_time}.",
            ),
            (
                "reminder_6h",
                "Reminder: {name}, your {session_type} session with {teacher} starts at {start_time}. See you soon!",
            ),
            (
                "package_approved",
                "Hi {name}, your {session_type} package of {sessions} sessions is active until {expiry_date}.",
            ),
            (
                "package_rejected",
                "Hi {name}, your package request was not approved. Note: {review_note}",
            ),
            (
                "package_expired",
                "Hi {name}, your {session_type} package expired on {expiry_date} with {remaining} unused sessions.",
            ),
            (
                "line_welcome",
                "Welcome to {studio}! Send the 6-character link code from your profile page to connect this LINE account.",
            ),
            (
                "line_help",
                "To connect your account, open your profile on the {studio} website and send the link code shown there.",
            ),
            (
                "line_linked",
                "Hi {name}, your LINE account is now connected to {studio}. Booking updates will arrive here.",
            ),
        ];

        for (key, content) in default_templates {
            let insert = Query::insert()
                .into_table(MessageTemplates::Table)
                .columns([
                    MessageTemplates::Key,
                    MessageTemplates::Content,
                    MessageTemplates::IsActive,
                    MessageTemplates::UpdatedAt,
                ])
                .values_panic([key.into(), content.into(), true.into(), now.into()])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InAppNotifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    TemplateKey,
    Content,
    ScheduledAt,
    Status,
    Attempts,
    LastError,
    SentAt,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InAppNotifications {
    Table,
    Id,
    UserId,
    NotificationType,
    Title,
    Content,
    ReferenceType,
    ReferenceId,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MessageTemplates {
    Table,
    Key,
    Content,
    IsActive,
    UpdatedAt,
}
