//! 顾客资料

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{app_component, current_user, forbidden, not_found, storage_error_response};
use crate::models::customers::requests::{
    CustomerListParams, CustomerListQuery, UpdateCustomerRequest,
};
use crate::models::customers::responses::CustomerResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::time::parse_date;

pub struct CustomerService {
    storage: Option<Arc<dyn Storage>>,
}

impl CustomerService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request),
        }
    }

    pub async fn list_customers(
        &self,
        query: CustomerListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let list_query = CustomerListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            search: query.search.filter(|s| !s.trim().is_empty()),
        };

        match storage.list_customers_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Customer list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 管理员、教师或顾客本人
    pub async fn get_customer(
        &self,
        customer_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        if me.role == UserRole::Customer && me.id != customer_id {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "You can only view your own profile",
            ));
        }

        let storage = self.get_storage(request)?;
        match load_customer(storage.as_ref(), customer_id).await {
            Ok(Some(response)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Customer retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }

    /// 管理员或顾客本人
    pub async fn update_customer(
        &self,
        customer_id: i64,
        update: UpdateCustomerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let me = current_user(request)?;
        if me.role != UserRole::Admin && me.id != customer_id {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "You can only update your own profile",
            ));
        }
        if let Some(birth_date) = update.birth_date.as_deref()
            && !birth_date.is_empty()
            && parse_date(birth_date).is_err()
        {
            return Ok(super::bad_request(
                ErrorCode::BadRequest,
                "birth_date must be YYYY-MM-DD",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.update_customer(customer_id, update).await {
            Ok(Some(_)) => match load_customer(storage.as_ref(), customer_id).await {
                Ok(Some(response)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    response,
                    "Customer updated successfully",
                ))),
                Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
                Err(e) => Ok(storage_error_response(&e)),
            },
            Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Customer not found")),
            Err(e) => Ok(storage_error_response(&e)),
        }
    }
}

async fn load_customer(
    storage: &dyn Storage,
    customer_id: i64,
) -> crate::errors::Result<Option<CustomerResponse>> {
    let Some(customer) = storage.get_customer(customer_id).await? else {
        return Ok(None);
    };
    let Some(user) = storage.get_user_by_id(customer_id).await? else {
        return Ok(None);
    };
    Ok(Some(CustomerResponse { user, customer }))
}
