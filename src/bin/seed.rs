use rust_decimal::Decimal;
use serde_json::{Value, json};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::NewUser,
        catalog::{CreateCategoryRequest, CreateProductRequest},
        stores::CreateStoreRequest,
        templates::CreateTemplateRequest,
    },
    models::{TemplateCategory, UserRole},
    repository::{PgRepository, StoreRepository},
    services::auth_service::hash_password,
};

const IMG: &str = "https://images.unsplash.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let repo = PgRepository::new(orm);

    let admin_id = ensure_admin(&repo, "admin", "admin123").await?;
    let template_id = seed_templates(&repo).await?;
    seed_demo_store(&repo, admin_id, template_id).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(
    repo: &dyn StoreRepository,
    username: &str,
    password: &str,
) -> anyhow::Result<i32> {
    if let Some(user) = repo.get_user_by_username(username).await? {
        return Ok(user.id);
    }
    let user = repo
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: UserRole::Admin,
        })
        .await?;
    Ok(user.id)
}

fn template(
    name: &str,
    category: TemplateCategory,
    description: &str,
    photo: &str,
    colors: (&str, &str),
    categories: [&str; 4],
) -> CreateTemplateRequest {
    CreateTemplateRequest {
        name: name.to_string(),
        category,
        description: description.to_string(),
        image_url: format!("{IMG}/{photo}?auto=format&fit=crop&w=400&h=250"),
        config: json!({
            "primaryColor": colors.0,
            "secondaryColor": colors.1,
            "heroImage": format!("{IMG}/{photo}?auto=format&fit=crop&w=1920&h=600"),
            "categories": categories,
        }),
        is_active: true,
    }
}

/// Returns the id of the ice cream template used by the demo store.
async fn seed_templates(repo: &dyn StoreRepository) -> anyhow::Result<Option<i32>> {
    let existing = repo.list_templates().await?;
    if !existing.is_empty() {
        return Ok(existing
            .iter()
            .find(|t| t.category == TemplateCategory::Sorveteria)
            .map(|t| t.id));
    }

    let templates = [
        template(
            "Sorveteria",
            TemplateCategory::Sorveteria,
            "Template perfeito para sorveterias com cardápio visual e sistema de pedidos",
            "photo-1568901346375-23c9450c58cd",
            ("#3B82F6", "#10B981"),
            ["Sorvetes", "Picolés", "Açaí", "Milkshakes"],
        ),
        template(
            "Açaí & Smoothies",
            TemplateCategory::Acai,
            "Ideal para lojas de açaí com customização de tamanhos e complementos",
            "photo-1511690743698-d9d85f2fbf38",
            ("#8B5CF6", "#06B6D4"),
            ["Açaí", "Smoothies", "Vitaminas", "Sucos"],
        ),
        template(
            "Lanchonete",
            TemplateCategory::Lanchonete,
            "Para lanchonetes com variedade de lanches e bebidas",
            "photo-1568901346375-23c9450c58cd",
            ("#F59E0B", "#EF4444"),
            ["Lanches", "Pastéis", "Bebidas", "Porções"],
        ),
        template(
            "Pizzaria",
            TemplateCategory::Pizzaria,
            "Template especializado para pizzarias com menu de sabores",
            "photo-1565299624946-b28f40a0ca4b",
            ("#DC2626", "#059669"),
            ["Pizzas Doces", "Pizzas Salgadas", "Bebidas", "Sobremesas"],
        ),
        template(
            "Café & Padaria",
            TemplateCategory::Cafe,
            "Para cafés e padarias com cardápio completo de bebidas e salgados",
            "photo-1501339847302-ac426a4a7cbb",
            ("#92400E", "#059669"),
            ["Cafés", "Salgados", "Doces", "Bebidas"],
        ),
        template(
            "Farmácia",
            TemplateCategory::Farmacia,
            "Template para farmácias com catálogo de medicamentos e produtos",
            "photo-1576091160399-112ba8d25d1f",
            ("#059669", "#3B82F6"),
            ["Medicamentos", "Higiene", "Cosméticos", "Vitaminas"],
        ),
    ];

    let mut first = None;
    for payload in templates {
        let created = repo.create_template(payload).await?;
        first.get_or_insert(created.id);
    }
    Ok(first)
}

async fn seed_demo_store(
    repo: &dyn StoreRepository,
    owner_id: i32,
    template_id: Option<i32>,
) -> anyhow::Result<()> {
    let slug = "sorveteria-do-joao";
    if repo.get_store_by_slug(slug).await?.is_some() {
        println!("Demo store already present");
        return Ok(());
    }

    let config: Value = json!({
        "primaryColor": "#3B82F6",
        "secondaryColor": "#10B981",
        "heroImage": format!("{IMG}/photo-1568901346375-23c9450c58cd?auto=format&fit=crop&w=1920&h=600"),
        "logo": format!("{IMG}/photo-1570197788417-0e82375c9371?auto=format&fit=crop&w=200&h=200"),
    });
    let store = repo
        .create_store(CreateStoreRequest {
            owner_id: Some(owner_id),
            template_id,
            name: "Sorveteria do João".into(),
            slug: slug.into(),
            description: Some("A melhor sorveteria da cidade com mais de 50 sabores!".into()),
            whatsapp: "5511999999999".into(),
            instagram: Some("sorveteria_joao".into()),
            email: Some("contato@sorveteriadojoao.com".into()),
            address: Some("Rua das Flores, 123 - Centro".into()),
            location: Some("Rua das Flores, 123 - Centro, São Paulo - SP".into()),
            pix_key: Some("pix@sorveteriadojoao.com".into()),
            enable_pix_qr: true,
            config,
            is_active: true,
        })
        .await?;

    let mut category_ids = Vec::new();
    for (sort_order, name) in (1..).zip(["Sorvetes", "Picolés", "Açaí", "Milkshakes"]) {
        let category = repo
            .create_category(CreateCategoryRequest {
                store_id: store.id,
                name: name.into(),
                sort_order,
                is_active: true,
            })
            .await?;
        category_ids.push(category.id);
    }

    let products = [
        (0, "Sorvete de Chocolate", "Delicioso sorvete de chocolate artesanal", 850, 1),
        (0, "Sorvete de Morango", "Sorvete cremoso com pedaços de morango", 900, 2),
        (1, "Picolé de Limão", "Picolé refrescante de limão siciliano", 500, 1),
    ];
    for (category, name, description, cents, sort_order) in products {
        repo.create_product(CreateProductRequest {
            store_id: store.id,
            category_id: Some(category_ids[category]),
            name: name.into(),
            description: Some(description.into()),
            price: Decimal::new(cents, 2),
            image_url: None,
            is_active: true,
            sort_order,
        })
        .await?;
    }

    println!(
        "Demo store `{}` created with access code {}",
        store.slug, store.access_code
    );
    Ok(())
}
