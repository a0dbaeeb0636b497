use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::catalog::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::AppResult,
    middleware::auth::Caller,
    models::Product,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/stores/{id}/products",
            get(list_products).post(create_product),
        )
        .route("/products/{id}", put(update_product).delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/products",
    params(("id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Products by sort order", body = ApiResponse<ProductList>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(catalog_service::list_products(&state, store_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Negative price or foreign category"),
        (status = 401, description = "No credentials"),
        (status = 403, description = "Wrong access code")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_product(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<i32>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        catalog_service::create_product(&state, &caller, store_id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_product(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        catalog_service::update_product(&state, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        catalog_service::delete_product(&state, &caller, id).await?,
    ))
}
