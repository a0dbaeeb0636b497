use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::templates::{CreateTemplateRequest, TemplateList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::StoreTemplate,
    response::ApiResponse,
    services::template_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/{id}", get(get_template))
}

#[utoipa::path(
    get,
    path = "/api/templates",
    responses(
        (status = 200, description = "Active templates", body = ApiResponse<TemplateList>)
    ),
    tag = "Templates"
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TemplateList>>> {
    Ok(Json(template_service::list_templates(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template", body = ApiResponse<StoreTemplate>),
        (status = 404, description = "Template not found")
    ),
    tag = "Templates"
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<StoreTemplate>>> {
    Ok(Json(template_service::get_template(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 200, description = "Template created", body = ApiResponse<StoreTemplate>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Templates"
)]
pub async fn create_template(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTemplateRequest>,
) -> AppResult<Json<ApiResponse<StoreTemplate>>> {
    Ok(Json(
        template_service::create_template(&state, &user, payload).await?,
    ))
}
