use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Analytics;

/// One day's aggregates for a store, upserted on `(store_id, date)`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertAnalyticsRequest {
    #[serde(default)]
    pub store_id: i32,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[schema(value_type = String)]
    pub sales: Decimal,
    pub order_count: i32,
    #[schema(value_type = String)]
    pub avg_ticket: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AnalyticsList {
    #[schema(value_type = Vec<Analytics>)]
    pub items: Vec<Analytics>,
}
