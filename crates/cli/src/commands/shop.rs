//! Shop credential management commands.
//!
//! # Usage
//!
//! ```bash
//! pl-cli shop add -d your-store.myshopify.com -t shpat_xxx
//! pl-cli shop list
//! pl-cli shop test -d your-store.myshopify.com
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for the admin
//!   database
//! - `SHOPIFY_API_VERSION` - Admin API version used by `shop test`

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;

use prolanding_admin::config::ShopifyConfig;
use prolanding_admin::db::shops::NewShop;
use prolanding_admin::db::{RepositoryError, ShopRepository};
use prolanding_admin::shopify::credentials::PgCredentialStore;
use prolanding_admin::shopify::{ShopifyClient, ShopifyError, queries};

const DEFAULT_API_VERSION: &str = "2024-01";

/// Errors that can occur during shop operations.
#[derive(Debug, Error)]
pub enum ShopCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Invalid domain.
    #[error("Invalid shop domain: {0}")]
    InvalidDomain(String),

    /// Shop not found.
    #[error("No shop registered for domain: {0}")]
    UnknownDomain(String),

    /// Admin API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),
}

/// Arguments for `shop add`.
#[derive(Debug)]
pub struct AddShop {
    pub domain: String,
    pub token: String,
    pub name: Option<String>,
    pub expires_in: Option<i64>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

async fn connect() -> Result<PgPool, ShopCommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| ShopCommandError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    Ok(PgPool::connect(&database_url).await?)
}

/// Register a new shop credential record.
pub async fn add(args: AddShop) -> Result<(), ShopCommandError> {
    if !args.domain.contains('.') {
        return Err(ShopCommandError::InvalidDomain(args.domain));
    }

    let pool = connect().await?;
    let repo = ShopRepository::new(&pool);

    let expires_at = args.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));
    let refreshable = args.client_id.is_some() && args.client_secret.is_some();

    let shop = repo
        .create(NewShop {
            domain: args.domain,
            name: args.name,
            access_token: args.token,
            expires_at,
            client_id: args.client_id,
            client_secret: args.client_secret,
        })
        .await?;

    tracing::info!(
        "Shop registered. ID: {}, Domain: {}, refreshable: {}",
        shop.id,
        shop.domain,
        refreshable
    );
    if !refreshable {
        tracing::warn!(
            "No client credentials supplied; the token cannot be refreshed when it expires."
        );
    }

    Ok(())
}

/// List configured shops.
pub async fn list() -> Result<(), ShopCommandError> {
    let pool = connect().await?;
    let repo = ShopRepository::new(&pool);

    let shops = repo.list().await?;
    if shops.is_empty() {
        tracing::info!("No shops registered.");
        return Ok(());
    }

    for shop in shops {
        let expiry = shop
            .expires_at
            .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());
        tracing::info!(
            "  [{}] {} (name: {}, expires: {}, refreshable: {})",
            shop.id,
            shop.domain,
            shop.name.as_deref().unwrap_or("-"),
            expiry,
            shop.client_id.is_some() && shop.client_secret.is_some(),
        );
    }

    Ok(())
}

/// Verify a shop's credentials with a live Admin API call.
pub async fn test(domain: &str) -> Result<(), ShopCommandError> {
    let pool = connect().await?;

    let shop = ShopRepository::new(&pool)
        .get_by_domain(domain)
        .await?
        .ok_or_else(|| ShopCommandError::UnknownDomain(domain.to_string()))?;

    let config = ShopifyConfig {
        api_version: std::env::var("SHOPIFY_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
    };
    let client = ShopifyClient::http(&config, Arc::new(PgCredentialStore::new(pool)));

    tracing::info!("Querying shop name on {}...", shop.domain);
    let data = client
        .request(shop.id, queries::SHOP_NAME, Value::Null)
        .await?;

    let name = data
        .pointer("/shop/name")
        .and_then(Value::as_str)
        .unwrap_or("(unknown)");
    let remote_domain = data
        .pointer("/shop/myshopifyDomain")
        .and_then(Value::as_str)
        .unwrap_or("(unknown)");

    tracing::info!("Credentials OK: {} ({})", name, remote_domain);
    Ok(())
}
