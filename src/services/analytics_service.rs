use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    dto::analytics::{AnalyticsList, AnalyticsQuery, UpsertAnalyticsRequest},
    error::{AppError, AppResult},
    middleware::auth::{Caller, ensure_store_access},
    models::{Analytics, max_amount},
    response::{ApiResponse, Meta},
    services::store_service::find_store,
    state::AppState,
};

/// Range bounds are compared as strings, so they must be zero-padded ISO dates.
fn check_date(field: &str, value: &str) -> AppResult<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("{field} must be YYYY-MM-DD")))
}

fn check_amount(field: &str, value: Decimal) -> AppResult<()> {
    if value < Decimal::ZERO || value > max_amount() {
        return Err(AppError::BadRequest(format!("{field} is out of range")));
    }
    Ok(())
}

pub async fn get_analytics(
    state: &AppState,
    caller: &Caller,
    store_id: i32,
    query: AnalyticsQuery,
) -> AppResult<ApiResponse<AnalyticsList>> {
    let store = find_store(state, store_id).await?;
    ensure_store_access(caller, &store)?;
    if let Some(start) = query.start_date.as_deref() {
        check_date("start_date", start)?;
    }
    if let Some(end) = query.end_date.as_deref() {
        check_date("end_date", end)?;
    }

    let items = state
        .repo
        .get_analytics(
            store.id,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Analytics", AnalyticsList { items }, Some(meta)))
}

pub async fn upsert_analytics(
    state: &AppState,
    caller: &Caller,
    store_id: i32,
    mut payload: UpsertAnalyticsRequest,
) -> AppResult<ApiResponse<Analytics>> {
    let store = find_store(state, store_id).await?;
    ensure_store_access(caller, &store)?;
    check_date("date", &payload.date)?;
    check_amount("sales", payload.sales)?;
    check_amount("avg_ticket", payload.avg_ticket)?;
    if payload.order_count < 0 {
        return Err(AppError::BadRequest("order_count must not be negative".into()));
    }

    payload.store_id = store.id;
    let row = state.repo.upsert_analytics(payload).await?;
    Ok(ApiResponse::success("Analytics updated", row, Some(Meta::empty())))
}
