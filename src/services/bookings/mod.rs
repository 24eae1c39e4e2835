pub mod availability;
pub mod blocks;
pub mod cancel;
pub mod create;
pub mod list;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::bookings::entities::Booking;
use crate::models::bookings::requests::{
    AvailabilityCheckQuery, AvailabilityQuery, BlockListParams, BookingListParams,
    CancelBookingRequest, CreateBlockRequest, CreateBookingRequest,
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::scheduling::StudioRules;
use crate::services::Notifier;
use crate::storage::Storage;

use super::{app_component, forbidden, not_found, storage_error_response};

pub struct BookingService {
    storage: Option<Arc<dyn Storage>>,
}

impl BookingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub(crate) fn rules(&self) -> StudioRules {
        StudioRules::from(&AppConfig::get().studio)
    }

    pub(crate) fn notifier(&self, storage: Arc<dyn Storage>) -> Notifier {
        Notifier::new(storage, &AppConfig::get().studio)
    }

    pub async fn list_bookings(
        &self,
        query: BookingListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_bookings(self, query, request).await
    }

    pub async fn create_booking(
        &self,
        booking: CreateBookingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_booking(self, booking, request).await
    }

    pub async fn get_booking(
        &self,
        booking_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::get_booking(self, booking_id, request).await
    }

    pub async fn confirm_booking(
        &self,
        booking_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::confirm_booking(self, booking_id, request).await
    }

    pub async fn complete_booking(
        &self,
        booking_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::complete_booking(self, booking_id, request).await
    }

    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        cancel: CancelBookingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_booking(self, booking_id, cancel, request).await
    }

    pub async fn day_availability(
        &self,
        query: AvailabilityQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        availability::day_availability(self, query, request).await
    }

    pub async fn check_availability(
        &self,
        query: AvailabilityCheckQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        availability::check_availability(self, query, request).await
    }

    pub async fn create_block(
        &self,
        block: CreateBlockRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        blocks::create_block(self, block, request).await
    }

    pub async fn list_blocks(
        &self,
        query: BlockListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        blocks::list_blocks(self, query, request).await
    }

    pub async fn delete_block(
        &self,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        blocks::delete_block(self, block_id, request).await
    }
}

/// 查看权限：预约顾客、任课教师或管理员
pub(crate) fn can_view(user: &User, booking: &Booking) -> bool {
    user.role == UserRole::Admin || booking.involves(user.id)
}

/// 教学操作权限（确认、完成）：任课教师或管理员
pub(crate) fn can_teach(user: &User, booking: &Booking) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => booking.teacher_id == user.id,
        UserRole::Customer => false,
    }
}

/// 读取预约并检查查看权限，失败时直接给出响应
pub(crate) async fn load_visible(
    storage: &dyn Storage,
    user: &User,
    booking_id: i64,
) -> Result<Booking, HttpResponse> {
    match storage.get_booking_by_id(booking_id).await {
        Ok(Some(booking)) if can_view(user, &booking) => Ok(booking),
        // 不暴露他人预约是否存在
        Ok(_) => Err(not_found(ErrorCode::BookingNotFound, "Booking not found")),
        Err(e) => Err(storage_error_response(&e)),
    }
}

pub(crate) fn booking_forbidden() -> HttpResponse {
    forbidden(
        ErrorCode::BookingPermissionDenied,
        "You do not have permission to modify this booking",
    )
}

pub(crate) fn invalid_status(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::BookingInvalidStatus,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookings::entities::BookingStatus;
    use crate::models::packages::entities::SessionType;
    use crate::models::users::entities::UserStatus;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("u{id}"),
            email: format!("u{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: format!("User {id}"),
            phone: None,
            line_user_id: None,
            line_linked: false,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking() -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            customer_id: 10,
            teacher_id: 20,
            package_id: Some(3),
            session_type: SessionType::Private,
            start_time: now,
            end_time: now,
            status: BookingStatus::Pending,
            note: None,
            cancel_reason: None,
            cancelled_by: None,
            cancelled_at: None,
            session_refunded: false,
            reminder_24h_sent: false,
            reminder_6h_sent: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_permissions() {
        let b = booking();
        assert!(can_view(&user(10, UserRole::Customer), &b));
        assert!(can_view(&user(20, UserRole::Teacher), &b));
        assert!(can_view(&user(1, UserRole::Admin), &b));
        assert!(!can_view(&user(11, UserRole::Customer), &b));
        assert!(!can_view(&user(21, UserRole::Teacher), &b));
    }

    #[test]
    fn test_teach_permissions() {
        let b = booking();
        assert!(can_teach(&user(20, UserRole::Teacher), &b));
        assert!(can_teach(&user(1, UserRole::Admin), &b));
        assert!(!can_teach(&user(10, UserRole::Customer), &b));
        assert!(!can_teach(&user(21, UserRole::Teacher), &b));
    }
}
