use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{StoreTemplate, TemplateCategory};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub category: TemplateCategory,
    pub description: String,
    pub image_url: String,
    #[schema(value_type = Object)]
    pub config: Value,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TemplateList {
    #[schema(value_type = Vec<StoreTemplate>)]
    pub items: Vec<StoreTemplate>,
}
