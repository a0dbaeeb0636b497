use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{Category, Product, Store};

/// Insertable store fields. The access code is never taken from the caller;
/// the repository generates it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateStoreRequest {
    pub owner_id: Option<i32>,
    pub template_id: Option<i32>,
    pub name: String,
    /// Derived from `name` when left empty.
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub whatsapp: String,
    pub instagram: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub pix_key: Option<String>,
    #[serde(default)]
    pub enable_pix_qr: bool,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: Value,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

/// Partial store update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStoreRequest {
    pub owner_id: Option<i32>,
    pub template_id: Option<i32>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub pix_key: Option<String>,
    pub enable_pix_qr: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub config: Option<Value>,
    pub is_active: Option<bool>,
}

/// Store as returned by read endpoints. `access_code` is the owner panel
/// credential and is only present for admins, the owner, or a caller that
/// already presented it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreView {
    pub id: i32,
    pub owner_id: Option<i32>,
    pub template_id: Option<i32>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    pub description: Option<String>,
    pub whatsapp: String,
    pub instagram: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub pix_key: Option<String>,
    pub enable_pix_qr: bool,
    #[schema(value_type = Object)]
    pub config: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl StoreView {
    pub fn new(store: Store, reveal_code: bool) -> Self {
        Self {
            id: store.id,
            owner_id: store.owner_id,
            template_id: store.template_id,
            name: store.name,
            slug: store.slug,
            access_code: reveal_code.then_some(store.access_code),
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
            created_at: store.created_at,
        }
    }

    pub fn public(store: Store) -> Self {
        Self::new(store, false)
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<StoreView>)]
    pub items: Vec<StoreView>,
}

/// Everything the public storefront page renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct StorePreview {
    pub store: StoreView,
    pub whatsapp_link: String,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}
