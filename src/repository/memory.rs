use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreRepository, generate_access_code, in_date_range};
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
    error::{RepoError, RepoResult},
    models::{Analytics, Category, Order, OrderStatus, Product, Store, StoreTemplate, User},
};

#[derive(Debug, Default)]
struct Tables {
    last_id: i32,
    users: BTreeMap<i32, User>,
    templates: BTreeMap<i32, StoreTemplate>,
    stores: BTreeMap<i32, Store>,
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    analytics: BTreeMap<(i32, String), Analytics>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn ensure_unique_store(
        &self,
        except: Option<i32>,
        slug: &str,
        access_code: &str,
    ) -> RepoResult<()> {
        for store in self.stores.values().filter(|s| Some(s.id) != except) {
            if store.slug == slug {
                return Err(collision(format!("stores.slug `{slug}` already exists")));
            }
            if store.access_code == access_code {
                return Err(collision(format!(
                    "stores.access_code `{access_code}` already exists"
                )));
            }
        }
        Ok(())
    }
}

fn collision(detail: String) -> RepoError {
    tracing::warn!(detail = %detail, "unique constraint violated");
    RepoError::UniqueViolation(detail)
}

/// Process-local backend. Ids come from one counter shared by every table.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for MemoryRepository {
    async fn get_user(&self, id: i32) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(collision(format!(
                "users.username `{}` already exists",
                user.username
            )));
        }
        let user = User {
            id: tables.next_id(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_templates(&self) -> RepoResult<Vec<StoreTemplate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .templates
            .values()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn get_template(&self, id: i32) -> RepoResult<Option<StoreTemplate>> {
        Ok(self.tables.read().await.templates.get(&id).cloned())
    }

    async fn create_template(&self, template: CreateTemplateRequest) -> RepoResult<StoreTemplate> {
        let mut tables = self.tables.write().await;
        let template = StoreTemplate {
            id: tables.next_id(),
            name: template.name,
            category: template.category,
            description: template.description,
            image_url: template.image_url,
            config: template.config,
            is_active: template.is_active,
        };
        tables.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn list_stores(&self) -> RepoResult<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn get_store(&self, id: i32) -> RepoResult<Option<Store>> {
        Ok(self.tables.read().await.stores.get(&id).cloned())
    }

    async fn get_store_by_slug(&self, slug: &str) -> RepoResult<Option<Store>> {
        let tables = self.tables.read().await;
        Ok(tables.stores.values().find(|s| s.slug == slug).cloned())
    }

    async fn get_store_by_access_code(&self, access_code: &str) -> RepoResult<Option<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .find(|s| s.access_code == access_code)
            .cloned())
    }

    async fn list_stores_by_owner(&self, owner_id: i32) -> RepoResult<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn create_store(&self, store: CreateStoreRequest) -> RepoResult<Store> {
        let mut tables = self.tables.write().await;
        let access_code = generate_access_code();
        tables.ensure_unique_store(None, &store.slug, &access_code)?;

        let store = Store {
            id: tables.next_id(),
            owner_id: store.owner_id,
            template_id: store.template_id,
            name: store.name,
            slug: store.slug,
            access_code,
            description: store.description,
            whatsapp: store.whatsapp,
            instagram: store.instagram,
            email: store.email,
            address: store.address,
            location: store.location,
            pix_key: store.pix_key,
            enable_pix_qr: store.enable_pix_qr,
            config: store.config,
            is_active: store.is_active,
            created_at: Utc::now(),
        };
        tracing::debug!(store_id = store.id, slug = %store.slug, "store created");
        tables.stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn update_store(&self, id: i32, patch: UpdateStoreRequest) -> RepoResult<Option<Store>> {
        let mut tables = self.tables.write().await;
        let Some(mut store) = tables.stores.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(slug) = patch.slug {
            tables.ensure_unique_store(Some(id), &slug, &store.access_code)?;
            store.slug = slug;
        }
        if let Some(owner_id) = patch.owner_id {
            store.owner_id = Some(owner_id);
        }
        if let Some(template_id) = patch.template_id {
            store.template_id = Some(template_id);
        }
        if let Some(name) = patch.name {
            store.name = name;
        }
        if let Some(description) = patch.description {
            store.description = Some(description);
        }
        if let Some(whatsapp) = patch.whatsapp {
            store.whatsapp = whatsapp;
        }
        if let Some(instagram) = patch.instagram {
            store.instagram = Some(instagram);
        }
        if let Some(email) = patch.email {
            store.email = Some(email);
        }
        if let Some(address) = patch.address {
            store.address = Some(address);
        }
        if let Some(location) = patch.location {
            store.location = Some(location);
        }
        if let Some(pix_key) = patch.pix_key {
            store.pix_key = Some(pix_key);
        }
        if let Some(enable_pix_qr) = patch.enable_pix_qr {
            store.enable_pix_qr = enable_pix_qr;
        }
        if let Some(config) = patch.config {
            store.config = config;
        }
        if let Some(is_active) = patch.is_active {
            store.is_active = is_active;
        }

        tables.stores.insert(id, store.clone());
        Ok(Some(store))
    }

    async fn list_categories_by_store(&self, store_id: i32) -> RepoResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    async fn get_category(&self, id: i32) -> RepoResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, category: CreateCategoryRequest) -> RepoResult<Category> {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: tables.next_id(),
            store_id: category.store_id,
            name: category.name,
            sort_order: category.sort_order,
            is_active: category.is_active,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i32,
        patch: UpdateCategoryRequest,
    ) -> RepoResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(sort_order) = patch.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(is_active) = patch.is_active {
            category.is_active = is_active;
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i32) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        // Same as the ON DELETE SET NULL on products.category_id.
        for product in tables
            .products
            .values_mut()
            .filter(|p| p.category_id == Some(id))
        {
            product.category_id = None;
        }
        Ok(true)
    }

    async fn list_products_by_store(&self, store_id: i32) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| p.store_id == store_id)
            .cloned()
            .collect();
        // stable sort keeps id order on ties
        products.sort_by_key(|p| p.sort_order);
        Ok(products)
    }

    async fn get_product(&self, id: i32) -> RepoResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, product: CreateProductRequest) -> RepoResult<Product> {
        let mut tables = self.tables.write().await;
        let product = Product {
            id: tables.next_id(),
            store_id: product.store_id,
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            is_active: product.is_active,
            sort_order: product.sort_order,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        patch: UpdateProductRequest,
    ) -> RepoResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(category_id) = patch.category_id {
            product.category_id = Some(category_id);
        }
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = is_active;
        }
        if let Some(sort_order) = patch.sort_order {
            product.sort_order = sort_order;
        }
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: i32) -> RepoResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn list_orders_by_store(&self, store_id: i32) -> RepoResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.store_id == store_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn get_order(&self, id: i32) -> RepoResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn create_order(&self, order: NewOrder) -> RepoResult<Order> {
        let mut tables = self.tables.write().await;
        let order = Order {
            id: tables.next_id(),
            store_id: order.store_id,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            customer_address: order.customer_address,
            items: order.items,
            total: order.total,
            status: order.status,
            notes: order.notes,
            created_at: Utc::now(),
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    async fn get_analytics(
        &self,
        store_id: i32,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> RepoResult<Vec<Analytics>> {
        let tables = self.tables.read().await;
        Ok(tables
            .analytics
            .values()
            .filter(|a| a.store_id == store_id && in_date_range(&a.date, start_date, end_date))
            .cloned()
            .collect())
    }

    async fn upsert_analytics(&self, analytics: UpsertAnalyticsRequest) -> RepoResult<Analytics> {
        let mut tables = self.tables.write().await;
        let key = (analytics.store_id, analytics.date.clone());
        let id = match tables.analytics.get(&key) {
            Some(existing) => existing.id,
            None => tables.next_id(),
        };
        let row = Analytics {
            id,
            store_id: analytics.store_id,
            date: analytics.date,
            sales: analytics.sales,
            order_count: analytics.order_count,
            avg_ticket: analytics.avg_ticket,
        };
        tracing::debug!(store_id = row.store_id, date = %row.date, "analytics upserted");
        tables.analytics.insert(key, row.clone());
        Ok(row)
    }
}
