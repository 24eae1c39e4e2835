//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 存储层、LINE 客户端与定时任务统一返回 `StudioError`，
//! HTTP 层再映射为 `ApiResponse` + `ErrorCode`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_studio_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum StudioError {
            $($variant(String),)*
        }

        impl StudioError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(StudioError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(StudioError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(StudioError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl StudioError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        StudioError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_studio_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    PackageUnavailable("E010", "Package Unavailable"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict Error"),
    InvalidTransition("E015", "Invalid Status Transition"),
    ExternalService("E016", "External Service Error"),
    Scheduler("E017", "Scheduler Error"),
}

impl StudioError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for StudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for StudioError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for StudioError {
    fn from(err: sea_orm::DbErr) -> Self {
        StudioError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for StudioError {
    fn from(err: chrono::ParseError) -> Self {
        StudioError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::ExternalService(err.to_string())
    }
}

impl From<tokio_cron_scheduler::JobSchedulerError> for StudioError {
    fn from(err: tokio_cron_scheduler::JobSchedulerError) -> Self {
        StudioError::Scheduler(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StudioError::cache_connection("test").code(), "E001");
        assert_eq!(StudioError::database_config("test").code(), "E003");
        assert_eq!(StudioError::validation("test").code(), "E007");
        assert_eq!(StudioError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            StudioError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            StudioError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_booking_error_codes() {
        assert_eq!(StudioError::conflict("slot taken").code(), "E014");
        assert_eq!(StudioError::invalid_transition("x").code(), "E015");
        assert_eq!(
            StudioError::external_service("line").error_type(),
            "External Service Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = StudioError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = StudioError::validation("Reason is required");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Reason is required"));
    }
}
