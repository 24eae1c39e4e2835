use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::customers::requests::{CustomerListParams, UpdateCustomerRequest};
use crate::models::users::entities::UserRole;
use crate::services::CustomerService;
use crate::utils::SafeIDI64;

static CUSTOMER_SERVICE: Lazy<CustomerService> = Lazy::new(CustomerService::new_lazy);

pub async fn list_customers(
    req: HttpRequest,
    query: web::Query<CustomerListParams>,
) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE.list_customers(query.into_inner(), &req).await
}

pub async fn get_customer(req: HttpRequest, customer_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE.get_customer(customer_id.0, &req).await
}

pub async fn update_customer(
    req: HttpRequest,
    customer_id: SafeIDI64,
    update_data: web::Json<UpdateCustomerRequest>,
) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE
        .update_customer(customer_id.0, update_data.into_inner(), &req)
        .await
}

pub fn configure_customer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/customers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(list_customers)),
            )
            // 本人检查在服务层
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer)),
    );
}
