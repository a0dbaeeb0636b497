pub mod analytics_service;
pub mod auth_service;
pub mod catalog_service;
pub mod order_service;
pub mod store_service;
pub mod template_service;
