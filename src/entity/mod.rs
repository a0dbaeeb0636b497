pub mod analytics;
pub mod categories;
pub mod orders;
pub mod products;
pub mod store_templates;
pub mod stores;
pub mod users;

pub use analytics::Entity as Analytics;
pub use categories::Entity as Categories;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use store_templates::Entity as StoreTemplates;
pub use stores::Entity as Stores;
pub use users::Entity as Users;
