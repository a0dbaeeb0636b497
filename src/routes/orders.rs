use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::orders::{CheckoutRequest, OrderList, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::Caller,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores/{id}/orders", get(list_orders).post(checkout))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/orders",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "No credentials")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(
        order_service::list_orders(&state, &caller, store_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/orders",
    params(("id" = i32, Path, description = "Store ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Empty cart or unavailable product"),
        (status = 404, description = "Store not found or inactive")
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::checkout(&state, store_id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    responses(
        (status = 200, description = "Order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::get_order(&state, &caller, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(
        order_service::update_order_status(&state, &caller, id, payload).await?,
    ))
}
