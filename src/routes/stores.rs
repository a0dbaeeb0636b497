use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::stores::{CreateStoreRequest, StoreList, StorePreview, StoreView, UpdateStoreRequest},
    error::AppResult,
    middleware::auth::{AuthUser, Caller},
    models::Store,
    response::ApiResponse,
    services::store_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route("/stores/{id}", get(get_store).put(update_store))
        .route("/stores/slug/{slug}", get(get_store_by_slug))
        .route("/stores/slug/{slug}/preview", get(preview_store))
        .route("/stores/access/{code}", get(get_store_by_access_code))
        .route("/stores/owner/{owner_id}", get(list_stores_by_owner))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    responses(
        (status = 200, description = "Active stores", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    Ok(Json(store_service::list_stores(&state, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 200, description = "Store created", body = ApiResponse<Store>),
        (status = 400, description = "Invalid name, slug or whatsapp"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Slug or access code taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    Ok(Json(store_service::create_store(&state, &user, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(("id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store", body = ApiResponse<StoreView>),
        (status = 404, description = "Store not found")
    ),
    tag = "Stores"
)]
pub async fn get_store(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<StoreView>>> {
    Ok(Json(store_service::get_store(&state, &caller, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = ApiResponse<Store>),
        (status = 401, description = "No credentials"),
        (status = 403, description = "Wrong access code, or owner/template/visibility change without admin"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    Ok(Json(
        store_service::update_store(&state, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/stores/slug/{slug}",
    params(("slug" = String, Path, description = "Store slug")),
    responses(
        (status = 200, description = "Store", body = ApiResponse<StoreView>),
        (status = 404, description = "Store not found")
    ),
    tag = "Stores"
)]
pub async fn get_store_by_slug(
    State(state): State<AppState>,
    caller: Caller,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<StoreView>>> {
    Ok(Json(
        store_service::get_store_by_slug(&state, &caller, &slug).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/stores/slug/{slug}/preview",
    params(("slug" = String, Path, description = "Store slug")),
    responses(
        (status = 200, description = "Storefront page data", body = ApiResponse<StorePreview>),
        (status = 404, description = "Store not found or inactive")
    ),
    tag = "Stores"
)]
pub async fn preview_store(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<StorePreview>>> {
    Ok(Json(store_service::preview_store(&state, &slug).await?))
}

#[utoipa::path(
    get,
    path = "/api/stores/access/{code}",
    params(("code" = String, Path, description = "Access code, case-insensitive")),
    responses(
        (status = 200, description = "Store", body = ApiResponse<Store>),
        (status = 404, description = "Unknown code")
    ),
    tag = "Stores"
)]
pub async fn get_store_by_access_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Store>>> {
    Ok(Json(
        store_service::get_store_by_access_code(&state, &code).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/stores/owner/{owner_id}",
    params(("owner_id" = i32, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Stores owned by the user", body = ApiResponse<StoreList>),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_stores_by_owner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(owner_id): Path<i32>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    Ok(Json(
        store_service::list_stores_by_owner(&state, &user, owner_id).await?,
    ))
}
