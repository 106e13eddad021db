//! Credential storage and the token refresher.
//!
//! The refresher hands out a currently valid access token for a shop,
//! minting and persisting a new one when the cached token is inside the
//! refresh buffer. Refreshes are serialized per shop so concurrent callers
//! collapse into one mint instead of racing on which persisted token wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::{debug, warn};

use prolanding_core::ShopId;

use super::transport::ShopifyTransport;
use super::ShopifyError;
use crate::db::shops::ShopRecord;
use crate::db::{RepositoryError, ShopRepository};

/// Tokens inside this window before expiry are treated as expired.
pub const REFRESH_BUFFER_SECS: i64 = 5 * 60;

/// Persistence abstraction for shop credential records.
///
/// Injected into the refresher so tests can supply an in-memory double and
/// no module-level mutable state exists.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the credential record for a shop.
    async fn get(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError>;

    /// Persist a refreshed token and its expiry for a shop.
    async fn save_token(
        &self,
        id: ShopId,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed credential store.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn get(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError> {
        ShopRepository::new(&self.pool).get(id).await
    }

    async fn save_token(
        &self,
        id: ShopId,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        ShopRepository::new(&self.pool)
            .save_token(id, access_token, expires_at)
            .await
    }
}

/// In-memory credential store for tests and dry runs.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    shops: Mutex<HashMap<ShopId, ShopRecord>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a credential record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, record: ShopRecord) {
        self.shops
            .lock()
            .expect("credential store lock poisoned")
            .insert(record.id, record);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError> {
        Ok(self
            .shops
            .lock()
            .map_err(|_| RepositoryError::Conflict("lock poisoned".to_string()))?
            .get(&id)
            .cloned())
    }

    async fn save_token(
        &self,
        id: ShopId,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut shops = self
            .shops
            .lock()
            .map_err(|_| RepositoryError::Conflict("lock poisoned".to_string()))?;
        let record = shops.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        record.access_token = SecretString::from(access_token.to_string());
        record.expires_at = expires_at;
        Ok(())
    }
}

/// A usable credential for one request: the shop's endpoint domain plus the
/// current access token.
#[derive(Clone, Debug)]
pub struct ShopAccess {
    /// Shop domain the request goes to.
    pub domain: String,
    /// Access token to send.
    pub token: SecretString,
}

/// Hands out currently valid credentials, refreshing through the issuance
/// endpoint when needed.
pub struct TokenRefresher {
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn ShopifyTransport>,
    /// Per-shop refresh serialization. The outer lock is held only long
    /// enough to fetch the per-shop mutex.
    refresh_locks: Mutex<HashMap<ShopId, Arc<tokio::sync::Mutex<()>>>>,
}

impl TokenRefresher {
    /// Create a refresher over a credential store and a transport.
    pub fn new(store: Arc<dyn CredentialStore>, transport: Arc<dyn ShopifyTransport>) -> Self {
        Self {
            store,
            transport,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return a currently valid credential for the shop.
    ///
    /// Tokens without an expiry are treated as long-lived and returned
    /// unconditionally. Tokens inside the refresh buffer are refreshed and
    /// the new token persisted before returning. At most one round-trip to
    /// the issuance endpoint happens per call, and only when needed.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UnknownShop` if no record exists, or the
    /// refresh failure when minting a new token fails.
    pub async fn valid_token(&self, shop_id: ShopId) -> Result<ShopAccess, ShopifyError> {
        let record = self
            .store
            .get(shop_id)
            .await?
            .ok_or(ShopifyError::UnknownShop(shop_id))?;

        if !needs_refresh(&record, Utc::now()) {
            return Ok(access_from(&record));
        }

        self.refresh(shop_id, false).await
    }

    /// Refresh regardless of the clock, always contacting the issuance
    /// endpoint. Used after an observed authentication failure.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UnknownShop` if no record exists, or the
    /// refresh failure when minting a new token fails.
    pub async fn force_refresh(&self, shop_id: ShopId) -> Result<ShopAccess, ShopifyError> {
        self.refresh(shop_id, true).await
    }

    async fn refresh(&self, shop_id: ShopId, forced: bool) -> Result<ShopAccess, ShopifyError> {
        let shop_lock = self.shop_lock(shop_id);
        let _guard = shop_lock.lock().await;

        // Re-read under the lock: a concurrent caller may have refreshed
        // while we waited, in which case the clock-triggered path is done.
        let record = self
            .store
            .get(shop_id)
            .await?
            .ok_or(ShopifyError::UnknownShop(shop_id))?;

        if !forced && !needs_refresh(&record, Utc::now()) {
            return Ok(access_from(&record));
        }

        let (Some(client_id), Some(client_secret)) = (&record.client_id, &record.client_secret)
        else {
            // No way to mint a new token. Hand back what we have and let the
            // remote call surface the verdict.
            warn!(
                shop = %shop_id,
                domain = %record.domain,
                "token needs refresh but shop has no client credentials; using stored token"
            );
            return Ok(access_from(&record));
        };

        let minted = self
            .transport
            .mint_token(&record.domain, client_id, client_secret)
            .await
            .map_err(ShopifyError::from)?;

        let expires_at = Utc::now() + Duration::seconds(minted.expires_in_secs);
        self.store
            .save_token(shop_id, &minted.access_token, Some(expires_at))
            .await?;

        debug!(shop = %shop_id, domain = %record.domain, %expires_at, "access token refreshed");

        Ok(ShopAccess {
            domain: record.domain,
            token: SecretString::from(minted.access_token),
        })
    }

    fn shop_lock(&self, shop_id: ShopId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .refresh_locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(locks.entry(shop_id).or_default())
    }
}

fn needs_refresh(record: &ShopRecord, now: DateTime<Utc>) -> bool {
    record
        .expires_at
        .is_some_and(|expires_at| now >= expires_at - Duration::seconds(REFRESH_BUFFER_SECS))
}

fn access_from(record: &ShopRecord) -> ShopAccess {
    ShopAccess {
        domain: record.domain.clone(),
        token: SecretString::from(record.access_token.expose_secret().to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::Value;

    use super::super::transport::{CallError, MintedToken};
    use super::*;

    /// Transport double: scripted execute outcomes, counted mint calls.
    #[derive(Default)]
    pub struct FakeTransport {
        pub execute_results: Mutex<Vec<Result<Value, CallError>>>,
        pub execute_calls: AtomicUsize,
        pub mint_calls: AtomicUsize,
        pub mint_delay: Option<std::time::Duration>,
    }

    #[async_trait]
    impl ShopifyTransport for FakeTransport {
        async fn execute(
            &self,
            _domain: &str,
            _access_token: &SecretString,
            _query: &str,
            _variables: Value,
        ) -> Result<Value, CallError> {
            self.execute_calls.fetch_add(1, Ordering::SeqCst);
            self.execute_results
                .lock()
                .expect("lock poisoned")
                .pop()
                .unwrap_or_else(|| Ok(serde_json::json!({})))
        }

        async fn mint_token(
            &self,
            _domain: &str,
            _client_id: &str,
            _client_secret: &SecretString,
        ) -> Result<MintedToken, CallError> {
            if let Some(delay) = self.mint_delay {
                tokio::time::sleep(delay).await;
            }
            let call = self.mint_calls.fetch_add(1, Ordering::SeqCst);
            Ok(MintedToken {
                access_token: format!("shpat_minted_{call}"),
                expires_in_secs: 86400,
            })
        }
    }

    pub fn record(
        id: ShopId,
        expires_at: Option<DateTime<Utc>>,
        refreshable: bool,
    ) -> ShopRecord {
        ShopRecord {
            id,
            domain: "test-store.myshopify.com".to_string(),
            name: Some("Test Store".to_string()),
            access_token: SecretString::from("shpat_cached"),
            expires_at,
            client_id: refreshable.then(|| "client-id".to_string()),
            client_secret: refreshable.then(|| SecretString::from("client-secret")),
        }
    }

    fn refresher_with(
        record: ShopRecord,
        transport: Arc<FakeTransport>,
    ) -> (TokenRefresher, Arc<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.insert(record);
        (
            TokenRefresher::new(Arc::clone(&store) as Arc<dyn CredentialStore>, transport),
            store,
        )
    }

    #[tokio::test]
    async fn test_fresh_token_returned_without_refresh() {
        let shop = ShopId::new(1);
        let transport = Arc::new(FakeTransport::default());
        let (refresher, _store) = refresher_with(
            record(shop, Some(Utc::now() + Duration::minutes(10)), true),
            Arc::clone(&transport),
        );

        let access = refresher.valid_token(shop).await.expect("token");
        assert_eq!(access.token.expose_secret(), "shpat_cached");
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_without_expiry_never_refreshed() {
        let shop = ShopId::new(1);
        let transport = Arc::new(FakeTransport::default());
        let (refresher, _store) =
            refresher_with(record(shop, None, true), Arc::clone(&transport));

        let access = refresher.valid_token(shop).await.expect("token");
        assert_eq!(access.token.expose_secret(), "shpat_cached");
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expiring_token_refreshed_once_and_persisted() {
        let shop = ShopId::new(1);
        let transport = Arc::new(FakeTransport::default());
        let (refresher, store) = refresher_with(
            record(shop, Some(Utc::now() + Duration::minutes(2)), true),
            Arc::clone(&transport),
        );

        let access = refresher.valid_token(shop).await.expect("token");
        assert_eq!(access.token.expose_secret(), "shpat_minted_0");
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 1);

        let saved = store.get(shop).await.expect("store").expect("record");
        assert_eq!(saved.access_token.expose_secret(), "shpat_minted_0");
        let expires_at = saved.expires_at.expect("expiry persisted");
        let expected = Utc::now() + Duration::seconds(86400);
        assert!((expires_at - expected).num_seconds().abs() < 5);
    }

    #[tokio::test]
    async fn test_stale_fallback_without_client_credentials() {
        let shop = ShopId::new(1);
        let transport = Arc::new(FakeTransport::default());
        let (refresher, _store) = refresher_with(
            record(shop, Some(Utc::now() - Duration::minutes(1)), false),
            Arc::clone(&transport),
        );

        // Expired, but nothing to mint with: best-effort stored token.
        let access = refresher.valid_token(shop).await.expect("token");
        assert_eq!(access.token.expose_secret(), "shpat_cached");
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_shop() {
        let transport = Arc::new(FakeTransport::default());
        let store = Arc::new(InMemoryCredentialStore::new());
        let refresher =
            TokenRefresher::new(store as Arc<dyn CredentialStore>, transport);

        let err = refresher.valid_token(ShopId::new(404)).await.expect_err("missing");
        assert!(matches!(err, ShopifyError::UnknownShop(id) if id == ShopId::new(404)));
    }

    #[tokio::test]
    async fn test_concurrent_expirers_collapse_into_one_mint() {
        let shop = ShopId::new(1);
        let transport = Arc::new(FakeTransport {
            mint_delay: Some(std::time::Duration::from_millis(20)),
            ..FakeTransport::default()
        });
        let (refresher, _store) = refresher_with(
            record(shop, Some(Utc::now() + Duration::minutes(2)), true),
            Arc::clone(&transport),
        );
        let refresher = Arc::new(refresher);

        let a = {
            let r = Arc::clone(&refresher);
            tokio::spawn(async move { r.valid_token(shop).await })
        };
        let b = {
            let r = Arc::clone(&refresher);
            tokio::spawn(async move { r.valid_token(shop).await })
        };

        let token_a = a.await.expect("join").expect("token");
        let token_b = b.await.expect("join").expect("token");

        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 1);
        assert_eq!(token_a.token.expose_secret(), token_b.token.expose_secret());
    }
}
