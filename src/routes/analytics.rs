use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::analytics::{AnalyticsList, AnalyticsQuery, UpsertAnalyticsRequest},
    error::AppResult,
    middleware::auth::Caller,
    models::Analytics,
    response::ApiResponse,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/stores/{id}/analytics",
        get(get_analytics).put(upsert_analytics),
    )
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/analytics",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code"),
        AnalyticsQuery
    ),
    responses(
        (status = 200, description = "Daily rows in date order", body = ApiResponse<AnalyticsList>),
        (status = 400, description = "Malformed date")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<i32>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<AnalyticsList>>> {
    Ok(Json(
        analytics_service::get_analytics(&state, &caller, store_id, query).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}/analytics",
    params(
        ("id" = i32, Path, description = "Store ID"),
        ("x-access-code" = Option<String>, Header, description = "Store access code")
    ),
    request_body = UpsertAnalyticsRequest,
    responses(
        (status = 200, description = "Row inserted or replaced", body = ApiResponse<Analytics>),
        (status = 400, description = "Malformed date")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn upsert_analytics(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<i32>,
    Json(payload): Json<UpsertAnalyticsRequest>,
) -> AppResult<Json<ApiResponse<Analytics>>> {
    Ok(Json(
        analytics_service::upsert_analytics(&state, &caller, store_id, payload).await?,
    ))
}
