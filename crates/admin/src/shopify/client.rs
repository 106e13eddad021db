//! Request wrapper over the transport with automatic credential recovery.
//!
//! Every request obtains a valid token from the refresher first. When the
//! remote call still comes back with an authentication-class failure, the
//! client performs exactly one forced refresh and retries the original call
//! exactly once. Any other failure propagates untouched.

use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};

use prolanding_core::ShopId;

use super::credentials::{CredentialStore, TokenRefresher};
use super::transport::{CallError, HttpTransport, ShopifyTransport};
use super::ShopifyError;
use crate::config::ShopifyConfig;

/// Shopify Admin API client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    refresher: TokenRefresher,
    transport: Arc<dyn ShopifyTransport>,
}

impl ShopifyClient {
    /// Create a client over an explicit transport (tests inject a double).
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, transport: Arc<dyn ShopifyTransport>) -> Self {
        Self {
            inner: Arc::new(ShopifyClientInner {
                refresher: TokenRefresher::new(store, Arc::clone(&transport)),
                transport,
            }),
        }
    }

    /// Create a production client over the real HTTP transport.
    #[must_use]
    pub fn http(config: &ShopifyConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self::new(store, Arc::new(HttpTransport::new(config)))
    }

    /// Issue a GraphQL document against a shop's Admin API.
    ///
    /// # Errors
    ///
    /// Authentication failures are retried once after a forced refresh; a
    /// second authentication failure, and every non-authentication failure,
    /// is returned to the caller with the remote message when available.
    #[instrument(
        skip(self, query, variables),
        fields(shop = %shop_id, operation = operation_name(query))
    )]
    pub async fn request(
        &self,
        shop_id: ShopId,
        query: &str,
        variables: Value,
    ) -> Result<Value, ShopifyError> {
        let access = self.inner.refresher.valid_token(shop_id).await?;

        match self
            .inner
            .transport
            .execute(&access.domain, &access.token, query, variables.clone())
            .await
        {
            Ok(data) => Ok(data),
            Err(CallError::Auth(message)) => {
                warn!(
                    shop = %shop_id,
                    operation = operation_name(query),
                    %message,
                    "authentication failure, forcing token refresh and retrying once"
                );
                let access = self.inner.refresher.force_refresh(shop_id).await?;
                self.inner
                    .transport
                    .execute(&access.domain, &access.token, query, variables)
                    .await
                    .map_err(ShopifyError::from)
            }
            Err(other) => Err(ShopifyError::from(other)),
        }
    }
}

/// Extract the operation name from a GraphQL document, for logging.
fn operation_name(query: &str) -> &str {
    query
        .split_whitespace()
        .nth(1)
        .map(|name| {
            name.split_once('(')
                .map_or(name, |(before, _)| before)
        })
        .unwrap_or("unknown")
}

/// Collect the `userErrors` messages from a mutation payload.
///
/// Shopify reports domain-level rejections (duplicate SKU, invalid field) in
/// a `userErrors` list on the mutation result rather than as GraphQL errors.
/// The media mutations use `mediaUserErrors` instead; both keys are checked.
#[must_use]
pub fn user_errors(data: &Value, mutation: &str) -> Vec<String> {
    data.get(mutation)
        .and_then(|m| m.get("userErrors").or_else(|| m.get("mediaUserErrors")))
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Return the first `userErrors` message as a `ShopifyError`, if any.
///
/// # Errors
///
/// Returns `ShopifyError::UserError` when the mutation reported at least one
/// user error.
pub fn check_user_errors(data: &Value, mutation: &str) -> Result<(), ShopifyError> {
    user_errors(data, mutation)
        .into_iter()
        .next()
        .map_or(Ok(()), |message| Err(ShopifyError::UserError(message)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use chrono::{Duration, Utc};
    use secrecy::ExposeSecret;

    use super::super::credentials::tests::{record, FakeTransport};
    use super::super::credentials::InMemoryCredentialStore;
    use super::super::GraphqlError;
    use super::*;

    fn client_with(
        transport: Arc<FakeTransport>,
        expires_in: Option<Duration>,
    ) -> ShopifyClient {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.insert(record(
            ShopId::new(1),
            expires_in.map(|d| Utc::now() + d),
            true,
        ));
        ShopifyClient::new(store, transport)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = Arc::new(FakeTransport {
            execute_results: Mutex::new(vec![Ok(serde_json::json!({"shop": {"name": "Test"}}))]),
            ..FakeTransport::default()
        });
        let client = client_with(Arc::clone(&transport), Some(Duration::minutes(30)));

        let data = client
            .request(ShopId::new(1), "query shopName { shop { name } }", serde_json::json!({}))
            .await
            .expect("success");
        assert_eq!(data["shop"]["name"], "Test");
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_error_triggers_single_forced_retry() {
        // Results pop from the back: first call fails auth, retry succeeds.
        let transport = Arc::new(FakeTransport {
            execute_results: Mutex::new(vec![
                Ok(serde_json::json!({"ok": true})),
                Err(CallError::Auth("expired".to_string())),
            ]),
            ..FakeTransport::default()
        });
        let client = client_with(Arc::clone(&transport), Some(Duration::minutes(30)));

        let data = client
            .request(ShopId::new(1), "query shopName { shop { name } }", serde_json::json!({}))
            .await
            .expect("recovered");
        assert_eq!(data["ok"], true);
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.execute_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_auth_failure_not_retried_again() {
        let transport = Arc::new(FakeTransport {
            execute_results: Mutex::new(vec![
                Err(CallError::Auth("still expired".to_string())),
                Err(CallError::Auth("expired".to_string())),
            ]),
            ..FakeTransport::default()
        });
        let client = client_with(Arc::clone(&transport), Some(Duration::minutes(30)));

        let err = client
            .request(ShopId::new(1), "query shopName { shop { name } }", serde_json::json!({}))
            .await
            .expect_err("retry budget exhausted");
        assert!(matches!(err, ShopifyError::Unauthorized(_)));
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.execute_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_auth_failure_not_retried() {
        let transport = Arc::new(FakeTransport {
            execute_results: Mutex::new(vec![Err(CallError::Graphql(vec![GraphqlError {
                message: "Field 'nope' doesn't exist".to_string(),
                path: vec![],
            }]))]),
            ..FakeTransport::default()
        });
        let client = client_with(Arc::clone(&transport), Some(Duration::minutes(30)));

        let err = client
            .request(ShopId::new(1), "query broken { nope }", serde_json::json!({}))
            .await
            .expect_err("graphql error");
        assert!(matches!(err, ShopifyError::Graphql(_)));
        assert_eq!(transport.mint_calls.load(Ordering::SeqCst), 0);
        assert_eq!(transport.execute_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_forced_refresh_persists_new_token() {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.insert(record(ShopId::new(1), Some(Utc::now() + Duration::hours(1)), true));
        let transport = Arc::new(FakeTransport {
            execute_results: Mutex::new(vec![
                Ok(serde_json::json!({})),
                Err(CallError::Auth("revoked".to_string())),
            ]),
            ..FakeTransport::default()
        });
        let client = ShopifyClient::new(
            Arc::clone(&store) as Arc<dyn super::super::credentials::CredentialStore>,
            Arc::clone(&transport) as Arc<dyn ShopifyTransport>,
        );

        client
            .request(ShopId::new(1), "query shopName { shop { name } }", serde_json::json!({}))
            .await
            .expect("recovered");

        let saved = store
            .get(ShopId::new(1))
            .await
            .expect("store")
            .expect("record");
        assert_eq!(saved.access_token.expose_secret(), "shpat_minted_0");
    }

    #[test]
    fn test_operation_name_extraction() {
        assert_eq!(
            operation_name("mutation productCreate($input: ProductInput!) { ... }"),
            "productCreate"
        );
        assert_eq!(operation_name("query getProducts { products }"), "getProducts");
        assert_eq!(operation_name(""), "unknown");
    }

    #[test]
    fn test_user_errors_extraction() {
        let data = serde_json::json!({
            "productCreate": {
                "product": null,
                "userErrors": [
                    { "field": ["variants"], "message": "SKU already in use" }
                ]
            }
        });
        assert_eq!(user_errors(&data, "productCreate"), vec!["SKU already in use"]);
        assert!(check_user_errors(&data, "productCreate").is_err());

        let clean = serde_json::json!({ "productCreate": { "userErrors": [] } });
        assert!(user_errors(&clean, "productCreate").is_empty());
        assert!(check_user_errors(&clean, "productCreate").is_ok());
    }

    #[test]
    fn test_user_errors_reads_media_user_errors() {
        let data = serde_json::json!({
            "productCreateMedia": {
                "media": [],
                "mediaUserErrors": [
                    { "field": ["media"], "message": "Media source is invalid" }
                ]
            }
        });
        assert_eq!(
            user_errors(&data, "productCreateMedia"),
            vec!["Media source is invalid"]
        );
        assert!(check_user_errors(&data, "productCreateMedia").is_err());
    }
}
