use axum::Router;

use crate::state::AppState;

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;
pub mod stores;
pub mod templates;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/templates", templates::router())
        .merge(stores::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(analytics::router())
}
