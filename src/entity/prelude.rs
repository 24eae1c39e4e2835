//! 预导入模块，方便使用

pub use super::bookings::{ActiveModel as BookingActiveModel, Entity as Bookings, Model as BookingModel};
pub use super::customers::{
    ActiveModel as CustomerActiveModel, Entity as Customers, Model as CustomerModel,
};
pub use super::in_app_notifications::{
    ActiveModel as InAppNotificationActiveModel, Entity as InAppNotifications,
    Model as InAppNotificationModel,
};
pub use super::message_templates::{
    ActiveModel as MessageTemplateActiveModel, Entity as MessageTemplates,
    Model as MessageTemplateModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::package_adjustments::{
    ActiveModel as PackageAdjustmentActiveModel, Entity as PackageAdjustments,
    Model as PackageAdjustmentModel,
};
pub use super::package_requests::{
    ActiveModel as PackageRequestActiveModel, Entity as PackageRequests,
    Model as PackageRequestModel,
};
pub use super::packages::{ActiveModel as PackageActiveModel, Entity as Packages, Model as PackageModel};
pub use super::payment_reports::{
    ActiveModel as PaymentReportActiveModel, Entity as PaymentReports, Model as PaymentReportModel,
};
pub use super::teacher_blocks::{
    ActiveModel as TeacherBlockActiveModel, Entity as TeacherBlocks, Model as TeacherBlockModel,
};
pub use super::teachers::{ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
