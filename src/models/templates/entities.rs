use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const BOOKING_CREATED: &str = "booking_created";
pub const BOOKING_CONFIRMED: &str = "booking_confirmed";
pub const BOOKING_CANCELLED: &str = "booking_cancelled";
pub const REMINDER_24H: &str = "reminder_24h";
pub const REMINDER_6H: &str = "reminder_6h";
pub const PACKAGE_APPROVED: &str = "package_approved";
pub const PACKAGE_REJECTED: &str = "package_rejected";
pub const PACKAGE_EXPIRED: &str = "package_expired";
pub const LINE_WELCOME: &str = "line_welcome";
pub const LINE_HELP: &str = "line_help";
pub const LINE_LINKED: &str = "line_linked";

pub const TEMPLATE_KEYS: &[&str] = &[
    BOOKING_CREATED,
    BOOKING_CONFIRMED,
    BOOKING_CANCELLED,
    REMINDER_24H,
    REMINDER_6H,
    PACKAGE_APPROVED,
    PACKAGE_REJECTED,
    PACKAGE_EXPIRED,
    LINE_WELCOME,
    LINE_HELP,
    LINE_LINKED,
];

/// LINE 消息模板，`{name}` 形式的占位符在发送时替换
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/template.ts")]
pub struct MessageTemplate {
    pub key: String,
    pub content: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}
