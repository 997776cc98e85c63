use std::sync::Arc;

use crate::{config::AppConfig, db::PoolManager, middleware::rate_limit::RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<PoolManager>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: AppConfig, db: PoolManager) -> Self {
        Self {
            config: Arc::new(config),
            db: Arc::new(db),
            rate_limiter: RateLimiter::new(),
        }
    }
}
