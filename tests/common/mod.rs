#![allow(dead_code)]

use std::sync::Arc;

use chrono::Days;
use rust_decimal::Decimal;
use serde_json::json;
use storefront_api::{
    dto::{
        analytics::UpsertAnalyticsRequest,
        auth::NewUser,
        catalog::{
            CreateCategoryRequest, CreateProductRequest, UpdateCategoryRequest,
            UpdateProductRequest,
        },
        orders::{NewOrder, UpdateOrderStatusRequest},
        stores::{CreateStoreRequest, UpdateStoreRequest},
        templates::CreateTemplateRequest,
    },
    error::RepoError,
    middleware::auth::{AuthUser, Caller},
    models::{OrderItem, OrderStatus, Store, TemplateCategory, UserRole},
    repository::StoreRepository,
    services::{order_service, store_service},
    state::AppState,
};

pub fn store_request(name: &str, slug: &str) -> CreateStoreRequest {
    CreateStoreRequest {
        name: name.into(),
        slug: slug.into(),
        whatsapp: "5511999999999".into(),
        config: json!({}),
        is_active: true,
        ..Default::default()
    }
}

pub fn product_request(
    store_id: i32,
    name: &str,
    cents: i64,
    sort_order: i32,
) -> CreateProductRequest {
    CreateProductRequest {
        store_id,
        name: name.into(),
        price: Decimal::new(cents, 2),
        sort_order,
        is_active: true,
        ..Default::default()
    }
}

pub async fn create_store(repo: &dyn StoreRepository, slug: &str) -> anyhow::Result<Store> {
    Ok(repo.create_store(store_request("Shop", slug)).await?)
}

pub async fn access_codes_are_short_and_distinct(
    repo: &dyn StoreRepository,
) -> anyhow::Result<()> {
    let mut codes = Vec::new();
    for i in 0..20 {
        let store = create_store(repo, &format!("code-shop-{i}")).await?;
        assert_eq!(store.access_code.len(), 6);
        assert!(
            store
                .access_code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
            "unexpected code {}",
            store.access_code
        );
        codes.push(store.access_code);
    }
    let total = codes.len();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), total);
    Ok(())
}

pub async fn slug_lookup_finds_created_store(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let created = create_store(repo, "x").await?;
    let found = repo.get_store_by_slug("x").await?.expect("store by slug");
    assert_eq!(found.slug, "x");
    assert_eq!(found.id, created.id);

    let by_code = repo
        .get_store_by_access_code(&created.access_code)
        .await?
        .expect("store by code");
    assert_eq!(by_code.id, created.id);

    assert!(repo.get_store_by_slug("missing").await?.is_none());
    Ok(())
}

pub async fn update_merges_fields(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let mut request = store_request("Old", "merge-shop");
    request.address = Some("123 St".into());
    let store = repo.create_store(request).await?;

    let updated = repo
        .update_store(
            store.id,
            UpdateStoreRequest {
                name: Some("New".into()),
                ..Default::default()
            },
        )
        .await?
        .expect("updated store");
    assert_eq!(updated.name, "New");
    assert_eq!(updated.address.as_deref(), Some("123 St"));
    assert_eq!(updated.access_code, store.access_code);

    assert!(
        repo.update_store(i32::MAX, UpdateStoreRequest::default())
            .await?
            .is_none()
    );
    Ok(())
}

pub async fn duplicate_slug_is_rejected(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    create_store(repo, "taken").await?;
    let err = repo
        .create_store(store_request("Other", "taken"))
        .await
        .expect_err("duplicate slug");
    assert!(
        matches!(err, RepoError::UniqueViolation(_)),
        "unexpected error {err:?}"
    );
    Ok(())
}

pub async fn products_follow_sort_order(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "sorted-shop").await?;
    for (name, sort_order) in [("C", 3), ("A", 1), ("B", 2)] {
        repo.create_product(product_request(store.id, name, 100, sort_order))
            .await?;
    }
    let orders: Vec<i32> = repo
        .list_products_by_store(store.id)
        .await?
        .iter()
        .map(|p| p.sort_order)
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
    Ok(())
}

pub async fn delete_reports_presence(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "delete-shop").await?;
    let product = repo
        .create_product(product_request(store.id, "Gone", 100, 0))
        .await?;

    assert!(repo.delete_product(product.id).await?);
    assert!(repo.get_product(product.id).await?.is_none());
    assert!(!repo.delete_product(product.id).await?);
    assert!(!repo.delete_product(i32::MAX).await?);
    Ok(())
}

pub async fn analytics_upsert_replaces_row(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "stats-shop").await?;
    let row = |cents: i64| UpsertAnalyticsRequest {
        store_id: store.id,
        date: "2024-01-01".into(),
        sales: Decimal::new(cents, 2),
        order_count: 1,
        avg_ticket: Decimal::new(1000, 2),
    };

    let first = repo.upsert_analytics(row(1000)).await?;
    let second = repo.upsert_analytics(row(2500)).await?;
    assert_eq!(first.id, second.id);

    let rows = repo.get_analytics(store.id, None, None).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-01-01");
    assert_eq!(rows[0].sales, Decimal::new(2500, 2));

    repo.upsert_analytics(UpsertAnalyticsRequest {
        date: "2024-02-01".into(),
        ..row(500)
    })
    .await?;
    let january = repo
        .get_analytics(store.id, Some("2024-01-01"), Some("2024-01-31"))
        .await?;
    assert_eq!(january.len(), 1);
    assert_eq!(repo.get_analytics(store.id, None, None).await?.len(), 2);
    Ok(())
}

pub fn order_request(store_id: i32, customer: &str) -> NewOrder {
    NewOrder {
        store_id,
        customer_name: customer.into(),
        customer_phone: "5511988887777".into(),
        customer_address: None,
        items: vec![OrderItem {
            product_id: 1,
            name: "Cola".into(),
            price: Decimal::new(500, 2),
            quantity: 2,
        }],
        total: Decimal::new(1000, 2),
        status: OrderStatus::Pending,
        notes: None,
    }
}

pub fn admin_caller() -> Caller {
    Caller {
        user: Some(AuthUser {
            user_id: 1,
            role: UserRole::Admin,
        }),
        access_code: None,
    }
}

pub async fn orders_are_newest_first(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "orders-shop").await?;
    let order = |name: &str| order_request(store.id, name);

    let first = repo.create_order(order("ten")).await?;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = repo.create_order(order("eleven")).await?;

    let listed = repo.list_orders_by_store(store.id).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[1].items, first.items);

    let updated = repo
        .update_order_status(first.id, OrderStatus::Delivered)
        .await?
        .expect("order");
    assert_eq!(updated.status, OrderStatus::Delivered);

    assert!(
        repo.update_order_status(i32::MAX, OrderStatus::Cancelled)
            .await?
            .is_none()
    );
    Ok(())
}

pub async fn template_to_product_flow(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let template = repo
        .create_template(CreateTemplateRequest {
            name: "Bar".into(),
            category: TemplateCategory::Lanchonete,
            description: "Drinks and snacks".into(),
            image_url: "https://example.com/bar.png".into(),
            config: json!({ "primaryColor": "#000000" }),
            is_active: true,
        })
        .await?;

    let mut request = store_request("Joe's Shop", "joes-shop");
    request.template_id = Some(template.id);
    let store = repo.create_store(request).await?;

    let drinks = repo
        .create_category(CreateCategoryRequest {
            store_id: store.id,
            name: "Drinks".into(),
            sort_order: 0,
            is_active: true,
        })
        .await?;

    let mut cola = product_request(store.id, "Cola", 500, 0);
    cola.category_id = Some(drinks.id);
    repo.create_product(cola).await?;

    let products = repo.list_products_by_store(store.id).await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Cola");
    assert_eq!(products[0].price.to_string(), "5.00");
    assert_eq!(products[0].category_id, Some(drinks.id));
    Ok(())
}

pub async fn duplicate_username_is_rejected(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let user = || NewUser {
        username: "owner".into(),
        password_hash: "hash".into(),
        role: UserRole::StoreOwner,
    };
    repo.create_user(user()).await?;
    let err = repo.create_user(user()).await.expect_err("duplicate username");
    assert!(matches!(err, RepoError::UniqueViolation(_)), "unexpected error {err:?}");
    Ok(())
}

pub async fn slug_collision_on_update_is_rejected(
    repo: &dyn StoreRepository,
) -> anyhow::Result<()> {
    create_store(repo, "first-slug").await?;
    let second = create_store(repo, "second-slug").await?;

    let err = repo
        .update_store(
            second.id,
            UpdateStoreRequest {
                slug: Some("first-slug".into()),
                ..Default::default()
            },
        )
        .await
        .expect_err("slug collision");
    assert!(matches!(err, RepoError::UniqueViolation(_)), "unexpected error {err:?}");

    let unchanged = repo.get_store(second.id).await?.expect("store");
    assert_eq!(unchanged.slug, "second-slug");

    // Re-saving its own slug is not a collision.
    let same = repo
        .update_store(
            second.id,
            UpdateStoreRequest {
                slug: Some("second-slug".into()),
                ..Default::default()
            },
        )
        .await?;
    assert!(same.is_some());
    Ok(())
}

pub async fn category_update_merges_fields(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "category-merge").await?;
    let category = repo
        .create_category(CreateCategoryRequest {
            store_id: store.id,
            name: "Drinks".into(),
            sort_order: 4,
            is_active: true,
        })
        .await?;

    let updated = repo
        .update_category(
            category.id,
            UpdateCategoryRequest {
                name: Some("Cold drinks".into()),
                ..Default::default()
            },
        )
        .await?
        .expect("category");
    assert_eq!(updated.name, "Cold drinks");
    assert_eq!(updated.sort_order, 4);
    assert!(updated.is_active);
    assert_eq!(updated.store_id, store.id);

    assert!(
        repo.update_category(i32::MAX, UpdateCategoryRequest::default())
            .await?
            .is_none()
    );
    Ok(())
}

pub async fn product_update_merges_fields(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "product-merge").await?;
    let mut request = product_request(store.id, "Cola", 500, 7);
    request.description = Some("Cold".into());
    let product = repo.create_product(request).await?;

    let updated = repo
        .update_product(
            product.id,
            UpdateProductRequest {
                price: Some(Decimal::new(650, 2)),
                ..Default::default()
            },
        )
        .await?
        .expect("product");
    assert_eq!(updated.price, Decimal::new(650, 2));
    assert_eq!(updated.name, "Cola");
    assert_eq!(updated.description.as_deref(), Some("Cold"));
    assert_eq!(updated.sort_order, 7);

    assert!(
        repo.update_product(i32::MAX, UpdateProductRequest::default())
            .await?
            .is_none()
    );
    Ok(())
}

pub async fn delete_category_detaches_products(repo: &dyn StoreRepository) -> anyhow::Result<()> {
    let store = create_store(repo, "category-delete").await?;
    let category = repo
        .create_category(CreateCategoryRequest {
            store_id: store.id,
            name: "Seasonal".into(),
            sort_order: 0,
            is_active: true,
        })
        .await?;
    let mut request = product_request(store.id, "Pumpkin", 900, 0);
    request.category_id = Some(category.id);
    let product = repo.create_product(request).await?;

    assert!(repo.delete_category(category.id).await?);
    assert!(repo.get_category(category.id).await?.is_none());
    assert!(!repo.delete_category(category.id).await?);

    let product = repo.get_product(product.id).await?.expect("product survives");
    assert_eq!(product.category_id, None);
    Ok(())
}

pub async fn preview_hides_inactive_items(repo: Arc<dyn StoreRepository>) -> anyhow::Result<()> {
    let store = create_store(repo.as_ref(), "preview-shop").await?;
    for (name, is_active) in [("Shown", true), ("Hidden", false)] {
        repo.create_category(CreateCategoryRequest {
            store_id: store.id,
            name: name.into(),
            sort_order: 0,
            is_active,
        })
        .await?;
        let mut product = product_request(store.id, name, 100, 0);
        product.is_active = is_active;
        repo.create_product(product).await?;
    }

    let state = AppState::new(repo, None);
    let preview = store_service::preview_store(&state, "preview-shop")
        .await?
        .data
        .expect("preview");
    let categories: Vec<&str> = preview.categories.iter().map(|c| c.name.as_str()).collect();
    let products: Vec<&str> = preview.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(categories, vec!["Shown"]);
    assert_eq!(products, vec!["Shown"]);
    assert!(preview.store.access_code.is_none());
    Ok(())
}

pub async fn cancelling_updates_the_order_day(
    repo: Arc<dyn StoreRepository>,
) -> anyhow::Result<()> {
    let store = create_store(repo.as_ref(), "cancel-shop").await?;
    let order = repo.create_order(order_request(store.id, "Ana")).await?;
    let day = order.created_at.date_naive();
    let date = day.format("%Y-%m-%d").to_string();
    let state = AppState::new(repo.clone(), None);

    order_service::refresh_daily_analytics(&state, store.id, day).await?;
    let rows = repo.get_analytics(store.id, Some(&date), Some(&date)).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_count, 1);
    assert_eq!(rows[0].sales, Decimal::new(1000, 2));

    order_service::update_order_status(
        &state,
        &admin_caller(),
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await?;
    let rows = repo.get_analytics(store.id, Some(&date), Some(&date)).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_count, 0);
    assert_eq!(rows[0].sales, Decimal::ZERO);

    // Refreshing another day never counts this order.
    let previous = day.checked_sub_days(Days::new(1)).expect("previous day");
    order_service::refresh_daily_analytics(&state, store.id, previous).await?;
    let all = repo.get_analytics(store.id, None, None).await?;
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|row| row.order_count == 0));
    Ok(())
}
