//! Shop credential repository.
//!
//! One row per configured shop, holding the current access token, its
//! optional expiry, and the optional client id/secret pair used to mint new
//! tokens. Read before every remote call; written only by the refresh path
//! and the setup flow.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::PgPool;

use prolanding_core::ShopId;

use super::RepositoryError;

// =============================================================================
// Types
// =============================================================================

/// A shop's credential record.
///
/// Implements `Debug` manually to redact the access token and client secret.
#[derive(Clone)]
pub struct ShopRecord {
    /// Database id.
    pub id: ShopId,
    /// Shop domain (e.g., your-store.myshopify.com).
    pub domain: String,
    /// Display name shown in shop listings.
    pub name: Option<String>,
    /// Current access token (redacted in debug output).
    pub access_token: SecretString,
    /// Absolute expiry of the access token. Absent means long-lived.
    pub expires_at: Option<DateTime<Utc>>,
    /// OAuth client id used to mint new tokens (absent for static tokens).
    pub client_id: Option<String>,
    /// OAuth client secret (redacted in debug output).
    pub client_secret: Option<SecretString>,
}

impl std::fmt::Debug for ShopRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopRecord")
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("name", &self.name)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Input for registering a new shop.
#[derive(Debug)]
pub struct NewShop {
    /// Shop domain (e.g., your-store.myshopify.com).
    pub domain: String,
    /// Display name.
    pub name: Option<String>,
    /// Initial access token.
    pub access_token: String,
    /// Token expiry if known.
    pub expires_at: Option<DateTime<Utc>>,
    /// Client id for token refresh.
    pub client_id: Option<String>,
    /// Client secret for token refresh.
    pub client_secret: Option<String>,
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i32,
    domain: String,
    name: Option<String>,
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl From<ShopRow> for ShopRecord {
    fn from(row: ShopRow) -> Self {
        Self {
            id: ShopId::new(row.id),
            domain: row.domain,
            name: row.name,
            access_token: SecretString::from(row.access_token),
            expires_at: row.expires_at,
            client_id: row.client_id,
            client_secret: row.client_secret.map(SecretString::from),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shop credential database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the domain is already
    /// registered, `RepositoryError::Database` for other failures.
    pub async fn create(&self, shop: NewShop) -> Result<ShopRecord, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            INSERT INTO shops (domain, name, access_token, expires_at, client_id, client_secret)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, domain, name, access_token, expires_at, client_id, client_secret
            ",
        )
        .bind(&shop.domain)
        .bind(&shop.name)
        .bind(&shop.access_token)
        .bind(shop.expires_at)
        .bind(&shop.client_id)
        .bind(&shop.client_secret)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("shop {} already registered", shop.domain))
            }
            _ => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// Get a shop by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, domain, name, access_token, expires_at, client_id, client_secret
            FROM shops
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShopRecord::from))
    }

    /// Get a shop by domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_domain(&self, domain: &str) -> Result<Option<ShopRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, domain, name, access_token, expires_at, client_id, client_secret
            FROM shops
            WHERE domain = $1
            ",
        )
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShopRecord::from))
    }

    /// List all registered shops.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ShopRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, domain, name, access_token, expires_at, client_id, client_secret
            FROM shops
            ORDER BY domain
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ShopRecord::from).collect())
    }

    /// Persist a refreshed access token and its new expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn save_token(
        &self,
        id: ShopId,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shops
            SET access_token = $2, expires_at = $3, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(access_token)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
