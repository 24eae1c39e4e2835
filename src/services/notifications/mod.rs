pub mod count;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notifications::requests::NotificationListParams;
use crate::storage::Storage;

use super::{app_component, current_user};

/// 站内通知收件箱，只能操作本人的通知
pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub async fn list_notifications(
        &self,
        query: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        list::list_notifications(self, request, user.id, query).await
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        count::get_unread_count(self, request, user.id).await
    }

    pub async fn mark_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        read::mark_read(self, request, user.id, notification_id).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        read::mark_all_read(self, request, user.id).await
    }
}
