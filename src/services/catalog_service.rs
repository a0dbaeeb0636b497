use rust_decimal::Decimal;

use crate::{
    dto::catalog::{
        CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList,
        UpdateCategoryRequest, UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{Caller, ensure_store_access},
    models::{Category, Product, max_amount},
    response::{ApiResponse, Meta},
    services::store_service::find_store,
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    store_id: i32,
) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.repo.list_categories_by_store(store_id).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    caller: &Caller,
    store_id: i32,
    mut payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let store = find_store(state, store_id).await?;
    ensure_store_access(caller, &store)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    payload.store_id = store.id;
    let category = state.repo.create_category(payload).await?;
    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

async fn find_category_for(state: &AppState, caller: &Caller, id: i32) -> AppResult<Category> {
    let category = state
        .repo
        .get_category(id)
        .await?
        .ok_or(AppError::NotFound)?;
    let store = find_store(state, category.store_id).await?;
    ensure_store_access(caller, &store)?;
    Ok(category)
}

pub async fn update_category(
    state: &AppState,
    caller: &Caller,
    id: i32,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    find_category_for(state, caller, id).await?;
    let category = state
        .repo
        .update_category(id, payload)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", category, Some(Meta::empty())))
}

pub async fn delete_category(
    state: &AppState,
    caller: &Caller,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_category_for(state, caller, id).await?;
    if !state.repo.delete_category(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_products(state: &AppState, store_id: i32) -> AppResult<ApiResponse<ProductList>> {
    let items = state.repo.list_products_by_store(store_id).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// A product's category, when given, must belong to the same store.
async fn check_category(state: &AppState, store_id: i32, category_id: Option<i32>) -> AppResult<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match state.repo.get_category(category_id).await? {
        Some(category) if category.store_id == store_id => Ok(()),
        _ => Err(AppError::BadRequest(format!(
            "category {category_id} does not belong to store {store_id}"
        ))),
    }
}

/// Rejects prices outside `0..=max_amount()` and fixes the scale at two
/// decimal places.
fn money(price: Decimal) -> AppResult<Decimal> {
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if price > max_amount() {
        return Err(AppError::BadRequest("price is too large".into()));
    }
    let mut price = price.round_dp(2);
    price.rescale(2);
    Ok(price)
}

pub async fn create_product(
    state: &AppState,
    caller: &Caller,
    store_id: i32,
    mut payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let store = find_store(state, store_id).await?;
    ensure_store_access(caller, &store)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    payload.price = money(payload.price)?;
    check_category(state, store.id, payload.category_id).await?;

    payload.store_id = store.id;
    let product = state.repo.create_product(payload).await?;
    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

async fn find_product_for(state: &AppState, caller: &Caller, id: i32) -> AppResult<Product> {
    let product = state
        .repo
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound)?;
    let store = find_store(state, product.store_id).await?;
    ensure_store_access(caller, &store)?;
    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    caller: &Caller,
    id: i32,
    mut payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product_for(state, caller, id).await?;
    if let Some(price) = payload.price {
        payload.price = Some(money(price)?);
    }
    check_category(state, existing.store_id, payload.category_id).await?;

    let product = state
        .repo
        .update_product(id, payload)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    caller: &Caller,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_product_for(state, caller, id).await?;
    if !state.repo.delete_product(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
