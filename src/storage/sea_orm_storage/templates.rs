use super::SeaOrmStorage;
use crate::entity::message_templates::{ActiveModel, Column, Entity as MessageTemplates};
use crate::errors::{Result, StudioError};
use crate::models::templates::{entities::MessageTemplate, requests::UpdateTemplateRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn list_message_templates_impl(&self) -> Result<Vec<MessageTemplate>> {
        let result = MessageTemplates::find()
            .order_by_asc(Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询消息模板失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_template()).collect())
    }

    pub async fn get_message_template_impl(&self, key: &str) -> Result<Option<MessageTemplate>> {
        let result = MessageTemplates::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("查询消息模板失败: {e}")))?;

        Ok(result.map(|m| m.into_template()))
    }

    /// 更新模板内容或启用状态
    pub async fn update_message_template_impl(
        &self,
        key: &str,
        update: UpdateTemplateRequest,
    ) -> Result<Option<MessageTemplate>> {
        let Some(existing) = MessageTemplates::find_by_id(key.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| StudioError::database_operation(format!("更新消息模板失败: {e}")))?;

        Ok(Some(result.into_template()))
    }
}
