//! LINE 消息模板管理

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{app_component, bad_request, not_found, storage_error_response};
use crate::models::templates::entities::TEMPLATE_KEYS;
use crate::models::templates::requests::{UpdateTemplateRequest, validate_template_content};
use crate::models::templates::responses::TemplateListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct TemplateService {
    storage: Option<Arc<dyn Storage>>,
}

impl TemplateService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub async fn list_templates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_message_templates().await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                TemplateListResponse { items },
                "Templates retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn update_template(
        &self,
        key: String,
        update: UpdateTemplateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if !TEMPLATE_KEYS.contains(&key.as_str()) {
            return Ok(not_found(ErrorCode::TemplateNotFound, "Unknown template key"));
        }
        if update.content.is_none() && update.is_active.is_none() {
            return Ok(bad_request(
                ErrorCode::TemplateInvalid,
                "Provide content or is_active",
            ));
        }
        if let Some(ref content) = update.content
            && let Err(msg) = validate_template_content(content)
        {
            return Ok(bad_request(ErrorCode::TemplateInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_message_template(&key, update).await {
            Ok(Some(template)) => {
                info!("Message template {} updated", template.key);
                Ok(HttpResponse::Ok().json(ApiResponse::success(template, "Template updated")))
            }
            Ok(None) => Ok(not_found(ErrorCode::TemplateNotFound, "Template not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }
}
