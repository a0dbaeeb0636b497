use serde_json::json;

use crate::{
    dto::stores::{CreateStoreRequest, StoreList, StorePreview, StoreView, UpdateStoreRequest},
    error::{AppError, AppResult},
    middleware::auth::{
        AuthUser, Caller, can_view_access_code, ensure_admin, ensure_store_access,
        normalize_access_code,
    },
    models::Store,
    response::{ApiResponse, Meta},
    slug::{normalize_whatsapp, slugify, whatsapp_link},
    state::AppState,
};

/// Loads a store or fails with `NotFound`.
pub async fn find_store(state: &AppState, id: i32) -> AppResult<Store> {
    state.repo.get_store(id).await?.ok_or(AppError::NotFound)
}

fn view_for(caller: &Caller, store: Store) -> StoreView {
    let reveal = can_view_access_code(caller, &store);
    StoreView::new(store, reveal)
}

pub async fn list_stores(state: &AppState, caller: &Caller) -> AppResult<ApiResponse<StoreList>> {
    let items: Vec<StoreView> = state
        .repo
        .list_stores()
        .await?
        .into_iter()
        .map(|store| view_for(caller, store))
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

pub async fn get_store(
    state: &AppState,
    caller: &Caller,
    id: i32,
) -> AppResult<ApiResponse<StoreView>> {
    let store = find_store(state, id).await?;
    Ok(ApiResponse::success("Store", view_for(caller, store), None))
}

pub async fn get_store_by_slug(
    state: &AppState,
    caller: &Caller,
    slug: &str,
) -> AppResult<ApiResponse<StoreView>> {
    let store = state
        .repo
        .get_store_by_slug(slug)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Store", view_for(caller, store), None))
}

/// Owner panel entry. The code is matched case-insensitively by
/// normalizing it before the exact-match lookup.
pub async fn get_store_by_access_code(
    state: &AppState,
    code: &str,
) -> AppResult<ApiResponse<Store>> {
    let code = normalize_access_code(code);
    let store = state
        .repo
        .get_store_by_access_code(&code)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(store_id = store.id, "store accessed by code");
    Ok(ApiResponse::success("Store", store, None))
}

pub async fn list_stores_by_owner(
    state: &AppState,
    user: &AuthUser,
    owner_id: i32,
) -> AppResult<ApiResponse<StoreList>> {
    if user.user_id != owner_id {
        ensure_admin(user)?;
    }
    let items: Vec<StoreView> = state
        .repo
        .list_stores_by_owner(owner_id)
        .await?
        .into_iter()
        .map(|store| StoreView::new(store, true))
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    mut payload: CreateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    ensure_admin(user)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    payload.slug = if payload.slug.trim().is_empty() {
        slugify(&payload.name)
    } else {
        slugify(&payload.slug)
    };
    if payload.slug.is_empty() {
        return Err(AppError::BadRequest("name does not yield a usable slug".into()));
    }
    payload.whatsapp = normalize_whatsapp(&payload.whatsapp)
        .ok_or_else(|| AppError::BadRequest("invalid whatsapp number".into()))?;

    if let Some(template_id) = payload.template_id {
        let template = state
            .repo
            .get_template(template_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("unknown template {template_id}")))?;
        if payload.config.is_null() {
            payload.config = template.config;
        }
    }
    if payload.config.is_null() {
        payload.config = json!({});
    }

    let store = state.repo.create_store(payload).await?;
    tracing::info!(store_id = store.id, slug = %store.slug, "store created");
    Ok(ApiResponse::success(
        "Store created",
        store,
        Some(Meta::empty()),
    ))
}

pub async fn update_store(
    state: &AppState,
    caller: &Caller,
    id: i32,
    mut payload: UpdateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    let existing = find_store(state, id).await?;
    ensure_store_access(caller, &existing)?;
    // Ownership, template and visibility are assigned by admins only.
    let admin_fields = payload.owner_id.is_some()
        || payload.template_id.is_some()
        || payload.is_active.is_some();
    if admin_fields && !caller.is_admin() {
        return Err(AppError::Forbidden);
    }

    if let Some(slug) = payload.slug.take() {
        let slug = slugify(&slug);
        if slug.is_empty() {
            return Err(AppError::BadRequest("slug must not be empty".into()));
        }
        payload.slug = Some(slug);
    }
    if let Some(whatsapp) = payload.whatsapp.take() {
        payload.whatsapp = Some(
            normalize_whatsapp(&whatsapp)
                .ok_or_else(|| AppError::BadRequest("invalid whatsapp number".into()))?,
        );
    }

    let store = state
        .repo
        .update_store(id, payload)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", store, Some(Meta::empty())))
}

/// Public storefront: active categories and products of an active store.
pub async fn preview_store(state: &AppState, slug: &str) -> AppResult<ApiResponse<StorePreview>> {
    let store = state
        .repo
        .get_store_by_slug(slug)
        .await?
        .filter(|s| s.is_active)
        .ok_or(AppError::NotFound)?;

    let categories = state
        .repo
        .list_categories_by_store(store.id)
        .await?
        .into_iter()
        .filter(|c| c.is_active)
        .collect();
    let products = state
        .repo
        .list_products_by_store(store.id)
        .await?
        .into_iter()
        .filter(|p| p.is_active)
        .collect();

    let preview = StorePreview {
        whatsapp_link: whatsapp_link(&store.whatsapp),
        store: StoreView::public(store),
        categories,
        products,
    };
    Ok(ApiResponse::success("Preview", preview, None))
}
