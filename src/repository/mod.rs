//! Typed data access over the storefront tables.
//!
//! [`StoreRepository`] is implemented by [`PgRepository`] (sea-orm over
//! postgres) and [`MemoryRepository`] (process-local maps). Exactly one is
//! built at startup and shared through [`AppState`](crate::state::AppState).
//!
//! Both backends follow the same rules:
//! - single-row fetches return `Ok(None)` when nothing matches;
//! - `list_templates` and `list_stores` only return active rows, every other
//!   listing returns inactive rows too;
//! - `users.username`, `stores.slug` and `stores.access_code` are unique and a
//!   collision is reported as [`RepoError::UniqueViolation`](crate::error::RepoError);
//! - updates of a missing id return `Ok(None)`, deletes return `Ok(false)`.

use async_trait::async_trait;
use rand::Rng;

use crate::{
    dto::{
        analytics::UpsertAnalyticsRequest,
        auth::NewUser,
        catalog::{
            CreateCategoryRequest, CreateProductRequest, UpdateCategoryRequest,
            UpdateProductRequest,
        },
        orders::NewOrder,
        stores::{CreateStoreRequest, UpdateStoreRequest},
        templates::CreateTemplateRequest,
    },
    error::RepoResult,
    models::{Analytics, Category, Order, OrderStatus, Product, Store, StoreTemplate, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

pub const ACCESS_CODE_LEN: usize = 6;
const ACCESS_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random 6-character uppercase alphanumeric store access code.
///
/// There is no retry on collision: the unique column rejects a duplicate and
/// the caller sees the failure.
pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| ACCESS_CODE_ALPHABET[rng.gen_range(0..ACCESS_CODE_ALPHABET.len())] as char)
        .collect()
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    // Users
    async fn get_user(&self, id: i32) -> RepoResult<Option<User>>;
    /// Exact, case-sensitive match.
    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;

    // Templates
    async fn list_templates(&self) -> RepoResult<Vec<StoreTemplate>>;
    async fn get_template(&self, id: i32) -> RepoResult<Option<StoreTemplate>>;
    async fn create_template(&self, template: CreateTemplateRequest) -> RepoResult<StoreTemplate>;

    // Stores
    async fn list_stores(&self) -> RepoResult<Vec<Store>>;
    async fn get_store(&self, id: i32) -> RepoResult<Option<Store>>;
    async fn get_store_by_slug(&self, slug: &str) -> RepoResult<Option<Store>>;
    /// Exact match; normalizing the caller's input is the caller's job.
    async fn get_store_by_access_code(&self, access_code: &str) -> RepoResult<Option<Store>>;
    async fn list_stores_by_owner(&self, owner_id: i32) -> RepoResult<Vec<Store>>;
    /// Stamps `created_at` and a fresh access code.
    async fn create_store(&self, store: CreateStoreRequest) -> RepoResult<Store>;
    async fn update_store(&self, id: i32, patch: UpdateStoreRequest) -> RepoResult<Option<Store>>;

    // Categories
    async fn list_categories_by_store(&self, store_id: i32) -> RepoResult<Vec<Category>>;
    async fn get_category(&self, id: i32) -> RepoResult<Option<Category>>;
    async fn create_category(&self, category: CreateCategoryRequest) -> RepoResult<Category>;
    async fn update_category(
        &self,
        id: i32,
        patch: UpdateCategoryRequest,
    ) -> RepoResult<Option<Category>>;
    async fn delete_category(&self, id: i32) -> RepoResult<bool>;

    // Products
    /// Ascending `sort_order`, insertion order on ties.
    async fn list_products_by_store(&self, store_id: i32) -> RepoResult<Vec<Product>>;
    async fn get_product(&self, id: i32) -> RepoResult<Option<Product>>;
    async fn create_product(&self, product: CreateProductRequest) -> RepoResult<Product>;
    async fn update_product(
        &self,
        id: i32,
        patch: UpdateProductRequest,
    ) -> RepoResult<Option<Product>>;
    async fn delete_product(&self, id: i32) -> RepoResult<bool>;

    // Orders
    /// Newest first.
    async fn list_orders_by_store(&self, store_id: i32) -> RepoResult<Vec<Order>>;
    async fn get_order(&self, id: i32) -> RepoResult<Option<Order>>;
    async fn create_order(&self, order: NewOrder) -> RepoResult<Order>;
    async fn update_order_status(&self, id: i32, status: OrderStatus)
    -> RepoResult<Option<Order>>;

    // Analytics
    /// Rows for a store, optionally bounded by an inclusive date range.
    async fn get_analytics(
        &self,
        store_id: i32,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> RepoResult<Vec<Analytics>>;
    /// Overwrites the `(store_id, date)` row when present, inserts otherwise.
    async fn upsert_analytics(&self, analytics: UpsertAnalyticsRequest) -> RepoResult<Analytics>;
}

pub(crate) fn in_date_range(date: &str, start_date: Option<&str>, end_date: Option<&str>) -> bool {
    start_date.is_none_or(|start| date >= start) && end_date.is_none_or(|end| date <= end)
}
