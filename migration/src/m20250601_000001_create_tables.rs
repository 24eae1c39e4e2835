use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(
                        ColumnDef::new(Users::LineUserId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 顾客资料表（主键即用户 ID）
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Nickname).string().null())
                    .col(ColumnDef::new(Customers::BirthDate).string().null())
                    .col(ColumnDef::new(Customers::MedicalNotes).text().null())
                    .col(ColumnDef::new(Customers::EmergencyContact).string().null())
                    .col(ColumnDef::new(Customers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Customers::Table, Customers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师资料表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teachers::Bio).text().null())
                    .col(ColumnDef::new(Teachers::Specialties).text().not_null())
                    .col(ColumnDef::new(Teachers::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Teachers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Teachers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 购买申请表
        manager
            .create_table(
                Table::create()
                    .table(PackageRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PackageRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::CustomerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::SessionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::TotalSessions)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::ValidityDays)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PackageRequests::Price).double().not_null())
                    .col(
                        ColumnDef::new(PackageRequests::PaymentReference)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(PackageRequests::Note).text().null())
                    .col(ColumnDef::new(PackageRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(PackageRequests::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PackageRequests::ReviewNote).text().null())
                    .col(
                        ColumnDef::new(PackageRequests::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::PackageId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PackageRequests::Table, PackageRequests::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程包表
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packages::CustomerId).big_integer().not_null())
                    .col(ColumnDef::new(Packages::SessionType).string().not_null())
                    .col(ColumnDef::new(Packages::TotalSessions).integer().not_null())
                    .col(
                        ColumnDef::new(Packages::RemainingSessions)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Packages::Price).double().not_null())
                    .col(ColumnDef::new(Packages::StartDate).big_integer().not_null())
                    .col(ColumnDef::new(Packages::ExpiryDate).big_integer().not_null())
                    .col(ColumnDef::new(Packages::Status).string().not_null())
                    .col(
                        ColumnDef::new(Packages::SourceRequestId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Packages::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Packages::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Packages::Table, Packages::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程包调整记录
        manager
            .create_table(
                Table::create()
                    .table(PackageAdjustments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PackageAdjustments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::PackageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::SessionsDelta)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::RemainingBefore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::RemainingAfter)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::ExpiryBefore)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::ExpiryAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PackageAdjustments::Reason).text().not_null())
                    .col(
                        ColumnDef::new(PackageAdjustments::AdjustedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageAdjustments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PackageAdjustments::Table, PackageAdjustments::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 预约表
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::CustomerId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::PackageId).big_integer().null())
                    .col(ColumnDef::new(Bookings::SessionType).string().not_null())
                    .col(ColumnDef::new(Bookings::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::Note).text().null())
                    .col(ColumnDef::new(Bookings::CancelReason).text().null())
                    .col(ColumnDef::new(Bookings::CancelledBy).big_integer().null())
                    .col(ColumnDef::new(Bookings::CancelledAt).big_integer().null())
                    .col(
                        ColumnDef::new(Bookings::SessionRefunded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bookings::Reminder24hSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bookings::Reminder6hSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师封锁时段表
        manager
            .create_table(
                Table::create()
                    .table(TeacherBlocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherBlocks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherBlocks::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherBlocks::BlockType).string().not_null())
                    .col(
                        ColumnDef::new(TeacherBlocks::StartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherBlocks::EndTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherBlocks::RecurrenceDays)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherBlocks::RecurrenceUntil)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TeacherBlocks::Reason).text().null())
                    .col(
                        ColumnDef::new(TeacherBlocks::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherBlocks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherBlocks::Table, TeacherBlocks::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 财务流水表
        manager
            .create_table(
                Table::create()
                    .table(PaymentReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentReports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentReports::CustomerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentReports::PackageId).big_integer().null())
                    .col(ColumnDef::new(PaymentReports::SessionType).string().null())
                    .col(ColumnDef::new(PaymentReports::Amount).double().not_null())
                    .col(ColumnDef::new(PaymentReports::Method).string().not_null())
                    .col(ColumnDef::new(PaymentReports::Reference).string().null())
                    .col(
                        ColumnDef::new(PaymentReports::RecordedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentReports::PaidAt).big_integer().not_null())
                    .col(ColumnDef::new(PaymentReports::Note).text().null())
                    .col(
                        ColumnDef::new(PaymentReports::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PaymentReports::Table, PaymentReports::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        let indexes = [
            ("idx_bookings_teacher_start", Bookings::Table, vec![Bookings::TeacherId, Bookings::StartTime]),
            ("idx_bookings_customer_start", Bookings::Table, vec![Bookings::CustomerId, Bookings::StartTime]),
            ("idx_bookings_status_start", Bookings::Table, vec![Bookings::Status, Bookings::StartTime]),
        ];
        for (name, table, cols) in indexes {
            let mut index = Index::create();
            index.if_not_exists().name(name).table(table);
            for col in cols {
                index.col(col);
            }
            manager.create_index(index.to_owned()).await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teacher_blocks_teacher_id")
                    .table(TeacherBlocks::Table)
                    .col(TeacherBlocks::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_packages_customer_status")
                    .table(Packages::Table)
                    .col(Packages::CustomerId)
                    .col(Packages::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_package_requests_status")
                    .table(PackageRequests::Table)
                    .col(PackageRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payment_reports_paid_at")
                    .table(PaymentReports::Table)
                    .col(PaymentReports::PaidAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherBlocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PackageAdjustments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PackageRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    Phone,
    LineUserId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    UserId,
    Nickname,
    BirthDate,
    MedicalNotes,
    EmergencyContact,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teachers {
    Table,
    UserId,
    Bio,
    Specialties,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PackageRequests {
    Table,
    Id,
    CustomerId,
    SessionType,
    TotalSessions,
    ValidityDays,
    Price,
    PaymentReference,
    Note,
    Status,
    ReviewedBy,
    ReviewNote,
    ReviewedAt,
    PackageId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Packages {
    Table,
    Id,
    CustomerId,
    SessionType,
    TotalSessions,
    RemainingSessions,
    Price,
    StartDate,
    ExpiryDate,
    Status,
    SourceRequestId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PackageAdjustments {
    Table,
    Id,
    PackageId,
    SessionsDelta,
    RemainingBefore,
    RemainingAfter,
    ExpiryBefore,
    ExpiryAfter,
    Reason,
    AdjustedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    CustomerId,
    TeacherId,
    PackageId,
    SessionType,
    StartTime,
    EndTime,
    Status,
    Note,
    CancelReason,
    CancelledBy,
    CancelledAt,
    SessionRefunded,
    #[sea_orm(iden = "reminder_24h_sent")]
    Reminder24hSent,
    #[sea_orm(iden = "reminder_6h_sent")]
    Reminder6hSent,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherBlocks {
    Table,
    Id,
    TeacherId,
    BlockType,
    StartTime,
    EndTime,
    RecurrenceDays,
    RecurrenceUntil,
    Reason,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentReports {
    Table,
    Id,
    CustomerId,
    PackageId,
    SessionType,
    Amount,
    Method,
    Reference,
    RecordedBy,
    PaidAt,
    Note,
    CreatedAt,
}
