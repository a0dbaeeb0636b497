pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod stores;
pub mod templates;

pub(crate) fn default_true() -> bool {
    true
}
