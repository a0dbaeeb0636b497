use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Admin,
    StoreOwner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::StoreOwner => "store_owner",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "store_owner" => Ok(UserRole::StoreOwner),
            other => Err(format!("unknown user role `{other}`")),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Sorveteria,
    Acai,
    Lanchonete,
    Pizzaria,
    Cafe,
    Farmacia,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Sorveteria => "sorveteria",
            TemplateCategory::Acai => "acai",
            TemplateCategory::Lanchonete => "lanchonete",
            TemplateCategory::Pizzaria => "pizzaria",
            TemplateCategory::Cafe => "cafe",
            TemplateCategory::Farmacia => "farmacia",
        }
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorveteria" => Ok(TemplateCategory::Sorveteria),
            "acai" => Ok(TemplateCategory::Acai),
            "lanchonete" => Ok(TemplateCategory::Lanchonete),
            "pizzaria" => Ok(TemplateCategory::Pizzaria),
            "cafe" => Ok(TemplateCategory::Cafe),
            "farmacia" => Ok(TemplateCategory::Farmacia),
            other => Err(format!("unknown template category `{other}`")),
        }
    }
}

/// Order lifecycle. Any status may move to any other; no transition graph
/// is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreTemplate {
    pub id: i32,
    pub name: String,
    pub category: TemplateCategory,
    pub description: String,
    pub image_url: String,
    /// Color scheme, hero image and suggested category names.
    #[schema(value_type = Object)]
    pub config: Value,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Store {
    pub id: i32,
    pub owner_id: Option<i32>,
    pub template_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub access_code: String,
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

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub store_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Most units of one product a single order line may carry.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Largest amount the `NUMERIC(10, 2)` money columns hold.
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// A product as it was when the order was placed. Later edits to the
/// product never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub store_id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Analytics {
    pub id: i32,
    pub store_id: i32,
    pub date: String,
    pub sales: Decimal,
    pub order_count: i32,
    pub avg_ticket: Decimal,
}
