//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::gemini::GeminiClient;
use crate::shopify::{PgCredentialStore, ShopifyClient};

/// Application state shared across all handlers.
///
/// Cheap to clone; all fields live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    shopify: ShopifyClient,
    gemini: GeminiClient,
}

impl AppState {
    /// Build the state: the Shopify client reads credentials from the same
    /// pool the repositories use.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgCredentialStore::new(pool.clone()));
        let shopify = ShopifyClient::http(&config.shopify, store);
        let gemini = GeminiClient::new(&config.gemini);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                shopify,
                gemini,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn shopify(&self) -> &ShopifyClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }
}
