use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analytics::{AnalyticsList, AnalyticsQuery, UpsertAnalyticsRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{
            CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList,
            UpdateCategoryRequest, UpdateProductRequest,
        },
        orders::{CheckoutLine, CheckoutRequest, OrderList, UpdateOrderStatusRequest},
        stores::{
            CreateStoreRequest, StoreList, StorePreview, StoreView, UpdateStoreRequest,
        },
        templates::{CreateTemplateRequest, TemplateList},
    },
    models::{
        Analytics, Category, Order, OrderItem, OrderStatus, Product, Store, StoreTemplate,
        TemplateCategory, User, UserRole,
    },
    response::{ApiResponse, Meta},
    routes::{analytics, auth, categories, health, orders, products, stores, templates},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        templates::list_templates,
        templates::get_template,
        templates::create_template,
        stores::list_stores,
        stores::create_store,
        stores::get_store,
        stores::update_store,
        stores::get_store_by_slug,
        stores::preview_store,
        stores::get_store_by_access_code,
        stores::list_stores_by_owner,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        analytics::get_analytics,
        analytics::upsert_analytics
    ),
    components(
        schemas(
            User,
            UserRole,
            StoreTemplate,
            TemplateCategory,
            Store,
            Category,
            Product,
            Order,
            OrderItem,
            OrderStatus,
            Analytics,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            CreateTemplateRequest,
            TemplateList,
            CreateStoreRequest,
            UpdateStoreRequest,
            StoreList,
            StorePreview,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CheckoutLine,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            UpsertAnalyticsRequest,
            AnalyticsQuery,
            AnalyticsList,
            Meta,
            StoreView,
            ApiResponse<Store>,
            ApiResponse<StoreView>,
            ApiResponse<StoreList>,
            ApiResponse<StorePreview>,
            ApiResponse<Product>,
            ApiResponse<Order>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Admin authentication"),
        (name = "Templates", description = "Store templates"),
        (name = "Stores", description = "Stores, lookups and storefront preview"),
        (name = "Catalog", description = "Categories and products"),
        (name = "Orders", description = "Checkout and order handling"),
        (name = "Analytics", description = "Daily store aggregates"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
