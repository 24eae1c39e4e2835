//! 教师资料

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{app_component, current_user, forbidden, not_found, storage_error_response};
use crate::models::teachers::requests::{
    TeacherListParams, TeacherListQuery, UpdateTeacherRequest,
};
use crate::models::teachers::responses::TeacherResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

const MAX_SPECIALTIES: usize = 20;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub async fn list_teachers(
        &self,
        query: TeacherListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        let storage = self.get_storage(request)?;
        let list_query = TeacherListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            // 顾客只能看到在职教师
            active_only: query.active_only || me.role == UserRole::Customer,
        };

        match storage.list_teachers_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Teacher list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    pub async fn get_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match load_teacher(storage.as_ref(), teacher_id).await {
            Ok(Some(response)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Teacher retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 管理员或教师本人；在职状态只能由管理员修改
    pub async fn update_teacher(
        &self,
        teacher_id: i64,
        mut update: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        if me.role != UserRole::Admin {
            if me.id != teacher_id {
                return Ok(forbidden(
                    ErrorCode::Forbidden,
                    "You can only update your own profile",
                ));
            }
            if update.is_active.is_some() {
                return Ok(forbidden(
                    ErrorCode::Forbidden,
                    "Only admins can change the active flag",
                ));
            }
        }

        if let Some(ref mut specialties) = update.specialties {
            specialties.retain(|s| !s.trim().is_empty());
            if specialties.len() > MAX_SPECIALTIES {
                return Ok(super::bad_request(
                    ErrorCode::BadRequest,
                    format!("At most {MAX_SPECIALTIES} specialties are allowed"),
                ));
            }
        }

        let storage = self.get_storage(request)?;
        match storage.update_teacher(teacher_id, update).await {
            Ok(Some(_)) => match load_teacher(storage.as_ref(), teacher_id).await {
                Ok(Some(response)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    response,
                    "Teacher updated successfully",
                ))),
                Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
                Err(e) => Ok(storage_error_response(&e)),
            },
            Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }
}

async fn load_teacher(
    storage: &dyn Storage,
    teacher_id: i64,
) -> crate::errors::Result<Option<TeacherResponse>> {
    let Some(teacher) = storage.get_teacher(teacher_id).await? else {
        return Ok(None);
    };
    let Some(user) = storage.get_user_by_id(teacher_id).await? else {
        return Ok(None);
    };
    Ok(Some(TeacherResponse { user, teacher }))
}
