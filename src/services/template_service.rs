use crate::{
    dto::templates::{CreateTemplateRequest, TemplateList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::StoreTemplate,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_templates(state: &AppState) -> AppResult<ApiResponse<TemplateList>> {
    let items = state.repo.list_templates().await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Templates", TemplateList { items }, Some(meta)))
}

pub async fn get_template(state: &AppState, id: i32) -> AppResult<ApiResponse<StoreTemplate>> {
    let template = state
        .repo
        .get_template(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Template", template, None))
}

pub async fn create_template(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTemplateRequest,
) -> AppResult<ApiResponse<StoreTemplate>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    let template = state.repo.create_template(payload).await?;
    Ok(ApiResponse::success(
        "Template created",
        template,
        Some(Meta::empty()),
    ))
}
