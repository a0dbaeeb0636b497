use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::catalog::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    error::AppResult,
    middleware::auth::Caller,
    models::Category,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/stores/{id}/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/categories",
    params(("id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Categories by sort order", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    Ok(Json(catalog_service::list_categories(&state, store_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/categories",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 401, description = "No credentials"),
        (status = 403, description = "Wrong access code")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<i32>,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    Ok(Json(
        catalog_service::create_category(&state, &caller, store_id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    Ok(Json(
        catalog_service::update_category(&state, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        catalog_service::delete_category(&state, &caller, id).await?,
    ))
}
