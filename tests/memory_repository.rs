mod common;

use std::sync::Arc;

use storefront_api::{
    dto::stores::UpdateStoreRequest,
    repository::{MemoryRepository, StoreRepository},
};

#[tokio::test]
async fn access_codes_are_short_and_distinct() -> anyhow::Result<()> {
    common::access_codes_are_short_and_distinct(&MemoryRepository::new()).await
}

#[tokio::test]
async fn slug_lookup_finds_created_store() -> anyhow::Result<()> {
    common::slug_lookup_finds_created_store(&MemoryRepository::new()).await
}

#[tokio::test]
async fn update_merges_fields() -> anyhow::Result<()> {
    common::update_merges_fields(&MemoryRepository::new()).await
}

#[tokio::test]
async fn duplicate_slug_is_rejected() -> anyhow::Result<()> {
    common::duplicate_slug_is_rejected(&MemoryRepository::new()).await
}

#[tokio::test]
async fn products_follow_sort_order() -> anyhow::Result<()> {
    common::products_follow_sort_order(&MemoryRepository::new()).await
}

#[tokio::test]
async fn delete_reports_presence() -> anyhow::Result<()> {
    common::delete_reports_presence(&MemoryRepository::new()).await
}

#[tokio::test]
async fn analytics_upsert_replaces_row() -> anyhow::Result<()> {
    common::analytics_upsert_replaces_row(&MemoryRepository::new()).await
}

#[tokio::test]
async fn orders_are_newest_first() -> anyhow::Result<()> {
    common::orders_are_newest_first(&MemoryRepository::new()).await
}

#[tokio::test]
async fn template_to_product_flow() -> anyhow::Result<()> {
    common::template_to_product_flow(&MemoryRepository::new()).await
}

#[tokio::test]
async fn duplicate_username_is_rejected() -> anyhow::Result<()> {
    common::duplicate_username_is_rejected(&MemoryRepository::new()).await
}

#[tokio::test]
async fn slug_collision_on_update_is_rejected() -> anyhow::Result<()> {
    common::slug_collision_on_update_is_rejected(&MemoryRepository::new()).await
}

#[tokio::test]
async fn category_update_merges_fields() -> anyhow::Result<()> {
    common::category_update_merges_fields(&MemoryRepository::new()).await
}

#[tokio::test]
async fn product_update_merges_fields() -> anyhow::Result<()> {
    common::product_update_merges_fields(&MemoryRepository::new()).await
}

#[tokio::test]
async fn delete_category_detaches_products() -> anyhow::Result<()> {
    common::delete_category_detaches_products(&MemoryRepository::new()).await
}

#[tokio::test]
async fn preview_hides_inactive_items() -> anyhow::Result<()> {
    common::preview_hides_inactive_items(Arc::new(MemoryRepository::new())).await
}

#[tokio::test]
async fn cancelling_updates_the_order_day() -> anyhow::Result<()> {
    common::cancelling_updates_the_order_day(Arc::new(MemoryRepository::new())).await
}

#[tokio::test]
async fn inactive_stores_are_hidden_from_listing() -> anyhow::Result<()> {
    let repo = MemoryRepository::new();
    let open = common::create_store(&repo, "open").await?;
    let closed = common::create_store(&repo, "closed").await?;
    repo.update_store(
        closed.id,
        UpdateStoreRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await?;

    let listed: Vec<i32> = repo.list_stores().await?.iter().map(|s| s.id).collect();
    assert_eq!(listed, vec![open.id]);
    // Direct lookups still see it.
    assert!(repo.get_store(closed.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn ids_are_never_reused() -> anyhow::Result<()> {
    let repo = MemoryRepository::new();
    let store = common::create_store(&repo, "ids").await?;
    let first = repo
        .create_product(common::product_request(store.id, "A", 100, 0))
        .await?;
    repo.delete_product(first.id).await?;
    let second = repo
        .create_product(common::product_request(store.id, "B", 100, 0))
        .await?;
    assert!(second.id > first.id);
    Ok(())
}
