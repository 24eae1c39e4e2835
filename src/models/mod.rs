pub mod auth;
pub mod bookings;
pub mod common;
pub mod customers;
pub mod notifications;
pub mod package_requests;
pub mod packages;
pub mod payments;
pub mod reports;
pub mod teachers;
pub mod templates;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
