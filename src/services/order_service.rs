use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    cart::{Cart, order_total},
    dto::{
        analytics::UpsertAnalyticsRequest,
        orders::{CheckoutRequest, NewOrder, OrderList, UpdateOrderStatusRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::{Caller, ensure_store_access},
    models::{Order, OrderStatus, max_amount},
    response::{ApiResponse, Meta},
    services::store_service::find_store,
    slug::normalize_whatsapp,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    caller: &Caller,
    store_id: i32,
) -> AppResult<ApiResponse<OrderList>> {
    let store = find_store(state, store_id).await?;
    ensure_store_access(caller, &store)?;
    let items = state.repo.list_orders_by_store(store.id).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

async fn find_order_for(state: &AppState, caller: &Caller, id: i32) -> AppResult<Order> {
    let order = state.repo.get_order(id).await?.ok_or(AppError::NotFound)?;
    let store = find_store(state, order.store_id).await?;
    ensure_store_access(caller, &store)?;
    Ok(order)
}

pub async fn get_order(state: &AppState, caller: &Caller, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = find_order_for(state, caller, id).await?;
    Ok(ApiResponse::success("Order", order, None))
}

/// Public checkout from the storefront cart.
///
/// Each line is priced from the live product and frozen into the order, so
/// `total` is always the sum of the stored line subtotals.
pub async fn checkout(
    state: &AppState,
    store_id: i32,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let store = find_store(state, store_id).await?;
    if !store.is_active {
        return Err(AppError::NotFound);
    }
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("customer_name is required".into()));
    }
    let phone = payload.customer_phone.trim();
    if phone.is_empty() {
        return Err(AppError::BadRequest("customer_phone is required".into()));
    }
    let customer_phone = normalize_whatsapp(phone).unwrap_or_else(|| phone.to_string());

    let mut cart = Cart::new();
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        let product = state
            .repo
            .get_product(line.product_id)
            .await?
            .filter(|p| p.store_id == store.id && p.is_active)
            .ok_or_else(|| {
                AppError::BadRequest(format!("product {} is not available", line.product_id))
            })?;
        cart.add_quantity(&product, line.quantity)
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
    }

    let items = cart.into_order_items();
    let total = order_total(&items);
    if total > max_amount() {
        return Err(AppError::BadRequest("order total is too large".into()));
    }
    let order = state
        .repo
        .create_order(NewOrder {
            store_id: store.id,
            customer_name: payload.customer_name,
            customer_phone,
            customer_address: payload.customer_address,
            total,
            items,
            status: OrderStatus::Pending,
            notes: payload.notes,
        })
        .await?;
    tracing::info!(order_id = order.id, store_id = store.id, total = %order.total, "order placed");

    // Separate write; a failure leaves the day's analytics stale.
    let day = order.created_at.date_naive();
    if let Err(err) = refresh_daily_analytics(state, store.id, day).await {
        tracing::warn!(error = %err, store_id = store.id, "analytics refresh failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    caller: &Caller,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = find_order_for(state, caller, id).await?;
    let order = state
        .repo
        .update_order_status(id, payload.status)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(
        order_id = order.id,
        from = existing.status.as_str(),
        to = order.status.as_str(),
        "order status changed"
    );

    // The order counts towards the day it was placed on, not today.
    let day = order.created_at.date_naive();
    if let Err(err) = refresh_daily_analytics(state, order.store_id, day).await {
        tracing::warn!(error = %err, store_id = order.store_id, "analytics refresh failed");
    }

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

/// Recomputes a store's analytics row for `day` (UTC) from its non-cancelled
/// orders placed that day.
pub async fn refresh_daily_analytics(
    state: &AppState,
    store_id: i32,
    day: NaiveDate,
) -> AppResult<()> {
    let orders: Vec<Order> = state
        .repo
        .list_orders_by_store(store_id)
        .await?
        .into_iter()
        .filter(|o| o.created_at.date_naive() == day && o.status != OrderStatus::Cancelled)
        .collect();

    let sales: Decimal = orders.iter().map(|o| o.total).sum();
    let order_count = orders.len() as i32;
    let avg_ticket = if order_count == 0 {
        Decimal::ZERO
    } else {
        (sales / Decimal::from(order_count)).round_dp(2)
    };

    state
        .repo
        .upsert_analytics(UpsertAnalyticsRequest {
            store_id,
            date: day.format("%Y-%m-%d").to_string(),
            sales,
            order_count,
            avg_ticket,
        })
        .await?;
    Ok(())
}
