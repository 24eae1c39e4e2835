pub mod auth;

pub mod users;

pub mod customers;

pub mod teachers;

pub mod bookings;

pub mod packages;

pub mod package_requests;

pub mod notifications;

pub mod reports;

pub mod line;

pub use auth::configure_auth_routes;
pub use bookings::configure_booking_routes;
pub use customers::configure_customer_routes;
pub use line::configure_line_routes;
pub use notifications::{configure_notification_routes, configure_template_routes};
pub use package_requests::configure_package_request_routes;
pub use packages::configure_package_routes;
pub use reports::configure_report_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_customer_routes)
        .configure(configure_teacher_routes)
        .configure(configure_booking_routes)
        .configure(configure_package_routes)
        .configure(configure_package_request_routes)
        .configure(configure_notification_routes)
        .configure(configure_template_routes)
        .configure(configure_report_routes)
        .configure(configure_line_routes);
}
