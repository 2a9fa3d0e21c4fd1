//! Shared application state.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::middleware::RateLimiter;
use crate::models::{Category, Product, Resource};
use crate::services::{CategoryService, ProductService};

/// Shared application state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: PgPool,
    categories: CategoryService,
    products: ProductService,
    rate_limiter: RateLimiter,
}

impl AppState {
    /// Initialize application state: pool, startup probe, schema, services.
    ///
    /// Panics if a resource's ordering map is incomplete — that is a
    /// configuration defect and must fail deployment, not the first list
    /// request.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)?;
        db::wait_until_available(&db).await?;
        db::run_migrations(&db).await?;

        let _ = Category::list_essentials();
        let _ = Product::list_essentials();

        info!("application state initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                categories: CategoryService::new(db.clone()),
                products: ProductService::new(db.clone()),
                rate_limiter: RateLimiter::new(config.api_request_limit_per_minute),
                db,
            }),
        })
    }

    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.rate_limiter
    }

    /// Liveness of the backing database, as reported by `SELECT 1`.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
