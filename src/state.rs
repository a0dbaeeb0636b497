use std::sync::Arc;

use crate::repository::StoreRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn StoreRepository>,
    pub jwt_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn StoreRepository>, jwt_secret: Option<String>) -> Self {
        Self {
            repo,
            jwt_secret: jwt_secret.map(Arc::from),
        }
    }
}
