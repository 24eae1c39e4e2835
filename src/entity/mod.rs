//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod bookings;
pub mod customers;
pub mod in_app_notifications;
pub mod message_templates;
pub mod notifications;
pub mod package_adjustments;
pub mod package_requests;
pub mod packages;
pub mod payment_reports;
pub mod teacher_blocks;
pub mod teachers;
pub mod users;
