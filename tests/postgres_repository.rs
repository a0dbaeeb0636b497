mod common;

use std::sync::Arc;

use sea_orm::ConnectionTrait;
use storefront_api::{
    db::{create_orm_conn, run_migrations},
    repository::{PgRepository, StoreRepository},
};

// Runs every repository check against a real database. Skips when no DB is
// configured in the environment.
#[tokio::test]
async fn postgres_repository_behaves_like_memory() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run postgres repository tests."
            );
            return Ok(());
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    orm.execute_unprepared(
        "TRUNCATE analytics, orders, products, categories, stores, store_templates, users RESTART IDENTITY CASCADE",
    )
    .await?;
    let repo: Arc<dyn StoreRepository> = Arc::new(PgRepository::new(orm));
    let pg = repo.as_ref();

    common::access_codes_are_short_and_distinct(pg).await?;
    common::slug_lookup_finds_created_store(pg).await?;
    common::update_merges_fields(pg).await?;
    common::duplicate_slug_is_rejected(pg).await?;
    common::duplicate_username_is_rejected(pg).await?;
    common::slug_collision_on_update_is_rejected(pg).await?;
    common::products_follow_sort_order(pg).await?;
    common::category_update_merges_fields(pg).await?;
    common::product_update_merges_fields(pg).await?;
    common::delete_reports_presence(pg).await?;
    common::delete_category_detaches_products(pg).await?;
    common::analytics_upsert_replaces_row(pg).await?;
    common::orders_are_newest_first(pg).await?;
    common::template_to_product_flow(pg).await?;
    common::preview_hides_inactive_items(repo.clone()).await?;
    common::cancelling_updates_the_order_day(repo.clone()).await?;
    Ok(())
}
