use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use storefront_api::{
    dto::auth::NewUser,
    models::UserRole,
    repository::{MemoryRepository, StoreRepository},
    routes::create_api_router,
    services::auth_service::hash_password,
    state::AppState,
};
use tower::ServiceExt;

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> anyhow::Result<Self> {
        let repo = Arc::new(MemoryRepository::new());
        repo.create_user(NewUser {
            username: "admin".into(),
            password_hash: hash_password("admin123")?,
            role: UserRole::Admin,
        })
        .await?;
        let state = AppState::new(repo, Some("test-secret".into()));
        let router = Router::new()
            .nest("/api", create_api_router())
            .with_state(state);
        Ok(Self { router })
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }
}

async fn login(app: &TestApp) -> anyhow::Result<String> {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            &[],
            Some(json!({ "username": "admin", "password": "admin123" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(format!("Bearer {}", body["data"]["token"].as_str().expect("token")))
}

#[tokio::test]
async fn wrong_password_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            &[],
            Some(json!({ "username": "admin", "password": "nope" })),
        )
        .await?;
    assert!(status.is_client_error());
    Ok(())
}

#[tokio::test]
async fn store_creation_requires_admin() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/stores",
            &[],
            Some(json!({ "name": "Nope", "whatsapp": "11999999999" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn owner_manages_catalog_and_customer_checks_out() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let admin = login(&app).await?;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/stores",
            &[("authorization", admin.as_str())],
            Some(json!({ "name": "Joe's Shop", "whatsapp": "(11) 99999-9999" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let store = &body["data"];
    let store_id = store["id"].as_i64().expect("store id");
    assert_eq!(store["slug"], "joe-s-shop");
    assert_eq!(store["whatsapp"], "5511999999999");
    let code = store["access_code"].as_str().expect("code").to_string();
    let lower = code.to_ascii_lowercase();

    let (status, body) = app
        .send(Method::GET, &format!("/api/stores/access/{lower}"), &[], None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64(), Some(store_id));

    let categories = format!("/api/stores/{store_id}/categories");
    let drinks = json!({ "name": "Drinks" });
    let (status, _) = app
        .send(Method::POST, &categories, &[], Some(drinks.clone()))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .send(
            Method::POST,
            &categories,
            &[("x-access-code", "ZZZZZZ")],
            Some(drinks.clone()),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app
        .send(
            Method::POST,
            &categories,
            &[("x-access-code", lower.as_str())],
            Some(drinks),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let category_id = body["data"]["id"].as_i64().expect("category id");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/stores/{store_id}/products"),
            &[("x-access-code", code.as_str())],
            Some(json!({ "name": "Cola", "price": "5", "category_id": category_id })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["price"], "5.00");
    let product_id = body["data"]["id"].as_i64().expect("product id");

    let (status, body) = app
        .send(Method::GET, "/api/stores/slug/joe-s-shop/preview", &[], None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["whatsapp_link"], "https://wa.me/5511999999999");
    assert_eq!(body["data"]["categories"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["products"][0]["name"], "Cola");
    assert!(body["data"]["store"].get("access_code").is_none(), "{body}");

    let orders = format!("/api/stores/{store_id}/orders");
    let (status, body) = app
        .send(
            Method::POST,
            &orders,
            &[],
            Some(json!({
                "customer_name": "Ana",
                "customer_phone": "11988887777",
                "items": [{ "product_id": product_id, "quantity": 2 }]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total"], "10.00");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["items"][0]["name"], "Cola");

    let (status, body) = app
        .send(
            Method::POST,
            &orders,
            &[],
            Some(json!({
                "customer_name": "Ana",
                "customer_phone": "11988887777",
                "items": [{ "product_id": product_id, "quantity": 0 }]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .send(
            Method::POST,
            &orders,
            &[],
            Some(json!({
                "customer_name": "Ana",
                "customer_phone": "11988887777",
                "items": [
                    { "product_id": product_id, "quantity": 2_000_000_000 },
                    { "product_id": product_id, "quantity": 2_000_000_000 }
                ]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .send(Method::GET, &orders, &[("x-access-code", code.as_str())], None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/stores/{store_id}/analytics"),
            &[("authorization", admin.as_str())],
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"][0]["order_count"], 1);
    assert_eq!(body["data"][0]["sales"], "10.00");
    Ok(())
}

#[tokio::test]
async fn inactive_store_has_no_preview() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let admin = login(&app).await?;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/stores",
            &[("authorization", admin.as_str())],
            Some(json!({
                "name": "Closed",
                "whatsapp": "11999999999",
                "is_active": false
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = app
        .send(Method::GET, "/api/stores/slug/closed/preview", &[], None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

async fn create_store(app: &TestApp, admin: &str, name: &str) -> anyhow::Result<Value> {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/stores",
            &[("authorization", admin)],
            Some(json!({ "name": name, "whatsapp": "11999999999" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body["data"].clone())
}

#[tokio::test]
async fn public_reads_never_expose_access_code() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let admin = login(&app).await?;
    let store = create_store(&app, &admin, "Quiet Shop").await?;
    let id = store["id"].as_i64().expect("id");
    let code = store["access_code"].as_str().expect("code").to_string();

    for uri in [
        "/api/stores".to_string(),
        format!("/api/stores/{id}"),
        "/api/stores/slug/quiet-shop".to_string(),
        "/api/stores/slug/quiet-shop/preview".to_string(),
    ] {
        let (status, body) = app.send(Method::GET, &uri, &[], None).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(!body.to_string().contains("access_code"), "{uri}: {body}");
    }

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/stores/{id}"),
            &[("authorization", admin.as_str())],
            None,
        )
        .await?;
    assert_eq!(body["data"]["access_code"], code.as_str());
    Ok(())
}

#[tokio::test]
async fn access_code_cannot_reassign_store() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let admin = login(&app).await?;
    let store = create_store(&app, &admin, "Kept Shop").await?;
    let uri = format!("/api/stores/{}", store["id"].as_i64().expect("id"));
    let code = store["access_code"].as_str().expect("code").to_string();
    let with_code = [("x-access-code", code.as_str())];

    for patch in [
        json!({ "owner_id": 999 }),
        json!({ "template_id": 1 }),
        json!({ "is_active": false }),
    ] {
        let (status, body) = app
            .send(Method::PUT, &uri, &with_code, Some(patch))
            .await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
    }

    let (status, body) = app
        .send(Method::PUT, &uri, &with_code, Some(json!({ "name": "Renamed" })))
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["owner_id"], Value::Null);

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            &[("authorization", admin.as_str())],
            Some(json!({ "is_active": false })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["is_active"], false);
    Ok(())
}
