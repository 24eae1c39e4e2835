//! LINE Messaging API：推送/回复客户端、Webhook 签名校验与事件结构

pub mod client;
pub mod events;
pub mod signature;

pub use client::LineClient;
pub use events::{EventSource, WebhookEvent, WebhookPayload};
pub use signature::verify_signature;
