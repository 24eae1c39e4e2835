pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod template;
pub mod time;
pub mod validate;

pub use extractor::{
    SafeBlockIdI64, SafeBookingIdI64, SafeIDI64, SafeNotificationIdI64, SafePackageIdI64,
    SafeRequestIdI64, SafeTemplateKey,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
