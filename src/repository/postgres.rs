use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QueryTrait, Set,
};

use super::{StoreRepository, generate_access_code};
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
    entity::{
        analytics::{
            ActiveModel as AnalyticsActive, Column as AnalyticsCol, Entity as AnalyticsRows,
            Model as AnalyticsModel,
        },
        categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
            Model as CategoryModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::{
            ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
            Model as ProductModel,
        },
        store_templates::{
            ActiveModel as TemplateActive, Column as TemplateCol, Entity as StoreTemplates,
            Model as TemplateModel,
        },
        stores::{ActiveModel as StoreActive, Column as StoreCol, Entity as Stores, Model as StoreModel},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{RepoError, RepoResult},
    models::{
        Analytics, Category, Order, OrderItem, OrderStatus, Product, Store, StoreTemplate,
        TemplateCategory, User, UserRole,
    },
};

/// Postgres backend built on sea-orm. Uniqueness is enforced by the schema.
#[derive(Debug, Clone)]
pub struct PgRepository {
    orm: DatabaseConnection,
}

impl PgRepository {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.orm
    }
}

fn classify(err: DbErr) -> RepoError {
    let err = RepoError::from(err);
    if let RepoError::UniqueViolation(detail) = &err {
        tracing::warn!(detail = %detail, "unique constraint violated");
    }
    err
}

#[async_trait]
impl StoreRepository for PgRepository {
    async fn get_user(&self, id: i32) -> RepoResult<Option<User>> {
        Users::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(user_from_entity)
            .transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Users::find()
            .filter(UserCol::Username.eq(username))
            .one(&self.orm)
            .await?
            .map(user_from_entity)
            .transpose()
    }

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let model = UserActive {
            id: NotSet,
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            role: Set(user.role.as_str().to_string()),
        }
        .insert(&self.orm)
        .await
        .map_err(classify)?;
        user_from_entity(model)
    }

    async fn list_templates(&self) -> RepoResult<Vec<StoreTemplate>> {
        StoreTemplates::find()
            .filter(TemplateCol::IsActive.eq(true))
            .order_by_asc(TemplateCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(template_from_entity)
            .collect()
    }

    async fn get_template(&self, id: i32) -> RepoResult<Option<StoreTemplate>> {
        StoreTemplates::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(template_from_entity)
            .transpose()
    }

    async fn create_template(&self, template: CreateTemplateRequest) -> RepoResult<StoreTemplate> {
        let model = TemplateActive {
            id: NotSet,
            name: Set(template.name),
            category: Set(template.category.as_str().to_string()),
            description: Set(template.description),
            image_url: Set(template.image_url),
            config: Set(template.config),
            is_active: Set(template.is_active),
        }
        .insert(&self.orm)
        .await?;
        template_from_entity(model)
    }

    async fn list_stores(&self) -> RepoResult<Vec<Store>> {
        Ok(Stores::find()
            .filter(StoreCol::IsActive.eq(true))
            .order_by_asc(StoreCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(store_from_entity)
            .collect())
    }

    async fn get_store(&self, id: i32) -> RepoResult<Option<Store>> {
        Ok(Stores::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(store_from_entity))
    }

    async fn get_store_by_slug(&self, slug: &str) -> RepoResult<Option<Store>> {
        Ok(Stores::find()
            .filter(StoreCol::Slug.eq(slug))
            .one(&self.orm)
            .await?
            .map(store_from_entity))
    }

    async fn get_store_by_access_code(&self, access_code: &str) -> RepoResult<Option<Store>> {
        Ok(Stores::find()
            .filter(StoreCol::AccessCode.eq(access_code))
            .one(&self.orm)
            .await?
            .map(store_from_entity))
    }

    async fn list_stores_by_owner(&self, owner_id: i32) -> RepoResult<Vec<Store>> {
        Ok(Stores::find()
            .filter(StoreCol::OwnerId.eq(owner_id))
            .order_by_asc(StoreCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(store_from_entity)
            .collect())
    }

    async fn create_store(&self, store: CreateStoreRequest) -> RepoResult<Store> {
        let model = StoreActive {
            id: NotSet,
            owner_id: Set(store.owner_id),
            template_id: Set(store.template_id),
            name: Set(store.name),
            slug: Set(store.slug),
            access_code: Set(generate_access_code()),
            description: Set(store.description),
            whatsapp: Set(store.whatsapp),
            instagram: Set(store.instagram),
            email: Set(store.email),
            address: Set(store.address),
            location: Set(store.location),
            pix_key: Set(store.pix_key),
            enable_pix_qr: Set(store.enable_pix_qr),
            config: Set(store.config),
            is_active: Set(store.is_active),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await
        .map_err(classify)?;

        tracing::debug!(store_id = model.id, slug = %model.slug, "store created");
        Ok(store_from_entity(model))
    }

    async fn update_store(&self, id: i32, patch: UpdateStoreRequest) -> RepoResult<Option<Store>> {
        let Some(existing) = Stores::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };

        let mut active: StoreActive = existing.into();
        if let Some(owner_id) = patch.owner_id {
            active.owner_id = Set(Some(owner_id));
        }
        if let Some(template_id) = patch.template_id {
            active.template_id = Set(Some(template_id));
        }
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(slug) = patch.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(whatsapp) = patch.whatsapp {
            active.whatsapp = Set(whatsapp);
        }
        if let Some(instagram) = patch.instagram {
            active.instagram = Set(Some(instagram));
        }
        if let Some(email) = patch.email {
            active.email = Set(Some(email));
        }
        if let Some(address) = patch.address {
            active.address = Set(Some(address));
        }
        if let Some(location) = patch.location {
            active.location = Set(Some(location));
        }
        if let Some(pix_key) = patch.pix_key {
            active.pix_key = Set(Some(pix_key));
        }
        if let Some(enable_pix_qr) = patch.enable_pix_qr {
            active.enable_pix_qr = Set(enable_pix_qr);
        }
        if let Some(config) = patch.config {
            active.config = Set(config);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }

        let model = active.update(&self.orm).await.map_err(classify)?;
        Ok(Some(store_from_entity(model)))
    }

    async fn list_categories_by_store(&self, store_id: i32) -> RepoResult<Vec<Category>> {
        Ok(Categories::find()
            .filter(CategoryCol::StoreId.eq(store_id))
            .order_by_asc(CategoryCol::SortOrder)
            .order_by_asc(CategoryCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect())
    }

    async fn get_category(&self, id: i32) -> RepoResult<Option<Category>> {
        Ok(Categories::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(category_from_entity))
    }

    async fn create_category(&self, category: CreateCategoryRequest) -> RepoResult<Category> {
        let model = CategoryActive {
            id: NotSet,
            store_id: Set(category.store_id),
            name: Set(category.name),
            sort_order: Set(category.sort_order),
            is_active: Set(category.is_active),
        }
        .insert(&self.orm)
        .await?;
        Ok(category_from_entity(model))
    }

    async fn update_category(
        &self,
        id: i32,
        patch: UpdateCategoryRequest,
    ) -> RepoResult<Option<Category>> {
        let Some(existing) = Categories::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };

        let mut active: CategoryActive = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }

        let model = active.update(&self.orm).await?;
        Ok(Some(category_from_entity(model)))
    }

    async fn delete_category(&self, id: i32) -> RepoResult<bool> {
        let result = Categories::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_products_by_store(&self, store_id: i32) -> RepoResult<Vec<Product>> {
        Ok(Products::find()
            .filter(ProductCol::StoreId.eq(store_id))
            .order_by_asc(ProductCol::SortOrder)
            .order_by_asc(ProductCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect())
    }

    async fn get_product(&self, id: i32) -> RepoResult<Option<Product>> {
        Ok(Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity))
    }

    async fn create_product(&self, product: CreateProductRequest) -> RepoResult<Product> {
        let model = ProductActive {
            id: NotSet,
            store_id: Set(product.store_id),
            category_id: Set(product.category_id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            image_url: Set(product.image_url),
            is_active: Set(product.is_active),
            sort_order: Set(product.sort_order),
        }
        .insert(&self.orm)
        .await?;
        Ok(product_from_entity(model))
    }

    async fn update_product(
        &self,
        id: i32,
        patch: UpdateProductRequest,
    ) -> RepoResult<Option<Product>> {
        let Some(existing) = Products::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };

        let mut active: ProductActive = existing.into();
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }

        let model = active.update(&self.orm).await?;
        Ok(Some(product_from_entity(model)))
    }

    async fn delete_product(&self, id: i32) -> RepoResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_orders_by_store(&self, store_id: i32) -> RepoResult<Vec<Order>> {
        Orders::find()
            .filter(OrderCol::StoreId.eq(store_id))
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect()
    }

    async fn get_order(&self, id: i32) -> RepoResult<Option<Order>> {
        Orders::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(order_from_entity)
            .transpose()
    }

    async fn create_order(&self, order: NewOrder) -> RepoResult<Order> {
        let items = serde_json::to_value(&order.items).map_err(|e| DbErr::Json(e.to_string()))?;
        let model = OrderActive {
            id: NotSet,
            store_id: Set(order.store_id),
            customer_name: Set(order.customer_name),
            customer_phone: Set(order.customer_phone),
            customer_address: Set(order.customer_address),
            items: Set(items),
            total: Set(order.total),
            status: Set(order.status.as_str().to_string()),
            notes: Set(order.notes),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        order_from_entity(model)
    }

    async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let Some(existing) = Orders::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };

        let mut active: OrderActive = existing.into();
        active.status = Set(status.as_str().to_string());
        let model = active.update(&self.orm).await?;
        order_from_entity(model).map(Some)
    }

    async fn get_analytics(
        &self,
        store_id: i32,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> RepoResult<Vec<Analytics>> {
        Ok(AnalyticsRows::find()
            .filter(AnalyticsCol::StoreId.eq(store_id))
            .apply_if(start_date, |q, start| q.filter(AnalyticsCol::Date.gte(start)))
            .apply_if(end_date, |q, end| q.filter(AnalyticsCol::Date.lte(end)))
            .order_by_asc(AnalyticsCol::Date)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(analytics_from_entity)
            .collect())
    }

    async fn upsert_analytics(&self, analytics: UpsertAnalyticsRequest) -> RepoResult<Analytics> {
        let active = AnalyticsActive {
            id: NotSet,
            store_id: Set(analytics.store_id),
            date: Set(analytics.date),
            sales: Set(analytics.sales),
            order_count: Set(analytics.order_count),
            avg_ticket: Set(analytics.avg_ticket),
        };

        let model = AnalyticsRows::insert(active)
            .on_conflict(
                OnConflict::columns([AnalyticsCol::StoreId, AnalyticsCol::Date])
                    .update_columns([
                        AnalyticsCol::Sales,
                        AnalyticsCol::OrderCount,
                        AnalyticsCol::AvgTicket,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.orm)
            .await?;

        tracing::debug!(store_id = model.store_id, date = %model.date, "analytics upserted");
        Ok(analytics_from_entity(model))
    }
}

fn user_from_entity(model: UserModel) -> RepoResult<User> {
    Ok(User {
        id: model.id,
        role: model.role.parse::<UserRole>().map_err(DbErr::Type)?,
        username: model.username,
        password_hash: model.password_hash,
    })
}

fn template_from_entity(model: TemplateModel) -> RepoResult<StoreTemplate> {
    Ok(StoreTemplate {
        id: model.id,
        name: model.name,
        category: model
            .category
            .parse::<TemplateCategory>()
            .map_err(DbErr::Type)?,
        description: model.description,
        image_url: model.image_url,
        config: model.config,
        is_active: model.is_active,
    })
}

fn store_from_entity(model: StoreModel) -> Store {
    Store {
        id: model.id,
        owner_id: model.owner_id,
        template_id: model.template_id,
        name: model.name,
        slug: model.slug,
        access_code: model.access_code,
        description: model.description,
        whatsapp: model.whatsapp,
        instagram: model.instagram,
        email: model.email,
        address: model.address,
        location: model.location,
        pix_key: model.pix_key,
        enable_pix_qr: model.enable_pix_qr,
        config: model.config,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        store_id: model.store_id,
        name: model.name,
        sort_order: model.sort_order,
        is_active: model.is_active,
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        store_id: model.store_id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        image_url: model.image_url,
        is_active: model.is_active,
        sort_order: model.sort_order,
    }
}

fn order_from_entity(model: OrderModel) -> RepoResult<Order> {
    let items: Vec<OrderItem> =
        serde_json::from_value(model.items).map_err(|e| DbErr::Json(e.to_string()))?;
    Ok(Order {
        id: model.id,
        store_id: model.store_id,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        items,
        total: model.total,
        status: model.status.parse::<OrderStatus>().map_err(DbErr::Type)?,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn analytics_from_entity(model: AnalyticsModel) -> Analytics {
    Analytics {
        id: model.id,
        store_id: model.store_id,
        date: model.date,
        sales: model.sales,
        order_count: model.order_count,
        avg_ticket: model.avg_ticket,
    }
}
