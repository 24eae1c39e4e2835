use serde::Serialize;
use ts_rs::TS;

use super::entities::MessageTemplate;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/template.ts")]
pub struct TemplateListResponse {
    pub items: Vec<MessageTemplate>,
}
