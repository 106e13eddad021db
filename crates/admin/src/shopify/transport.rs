//! Wire layer for the Admin API: GraphQL execution and token minting.
//!
//! The transport returns an explicit [`CallError`] tag instead of throwing,
//! so the client's retry decision is a plain `match` on the outcome. The
//! trait boundary also gives the credential tests an in-memory double.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use super::{GraphqlError, ShopifyError};
use crate::config::ShopifyConfig;

/// Outcome tags for a single wire call.
#[derive(Debug)]
pub enum CallError {
    /// Authentication-class failure: transport-level 401, or an error
    /// payload whose message references the access token. The caller may
    /// recover with one forced refresh.
    Auth(String),

    /// GraphQL errors unrelated to authentication. Never retried.
    Graphql(Vec<GraphqlError>),

    /// Transport failure (network, TLS, timeout). Never retried here;
    /// retry policy for these belongs to the caller.
    Http(reqwest::Error),

    /// The response body could not be decoded.
    Parse(String),

    /// The credential issuance endpoint returned a non-success response.
    Refresh(String),
}

impl From<CallError> for ShopifyError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Auth(msg) => Self::Unauthorized(msg),
            CallError::Graphql(errors) => Self::Graphql(errors),
            CallError::Http(e) => Self::Http(e),
            CallError::Parse(msg) => Self::Graphql(vec![GraphqlError {
                message: msg,
                path: vec![],
            }]),
            CallError::Refresh(msg) => Self::Refresh(msg),
        }
    }
}

/// A freshly minted access token with its relative expiry.
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// The new access token.
    pub access_token: String,
    /// Seconds until the token expires.
    pub expires_in_secs: i64,
}

/// The Admin API wire operations the refresher and client depend on.
#[async_trait]
pub trait ShopifyTransport: Send + Sync {
    /// Execute a GraphQL document against a shop's Admin API endpoint.
    async fn execute(
        &self,
        domain: &str,
        access_token: &SecretString,
        query: &str,
        variables: Value,
    ) -> Result<Value, CallError>;

    /// Mint a new access token from the shop's issuance endpoint.
    async fn mint_token(
        &self,
        domain: &str,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<MintedToken, CallError>;
}

// =============================================================================
// Production transport
// =============================================================================

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphqlErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<Value>,
}

/// Token response from the issuance endpoint.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

const fn default_expires_in() -> i64 {
    86400
}

/// Messages that mark a GraphQL-level authentication failure.
fn is_auth_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("access token") || lower.contains("invalid api key")
}

/// `reqwest`-backed transport against the real Admin API.
pub struct HttpTransport {
    client: reqwest::Client,
    api_version: String,
}

impl HttpTransport {
    /// Create a transport for the configured API version.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_version: config.api_version.clone(),
        }
    }
}

#[async_trait]
impl ShopifyTransport for HttpTransport {
    async fn execute(
        &self,
        domain: &str,
        access_token: &SecretString,
        query: &str,
        variables: Value,
    ) -> Result<Value, CallError> {
        let endpoint = format!(
            "https://{domain}/admin/api/{}/graphql.json",
            self.api_version
        );

        let response = self
            .client
            .post(&endpoint)
            .header("X-Shopify-Access-Token", access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(CallError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CallError::Auth(
                "invalid or expired access token".to_string(),
            ));
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| CallError::Parse(e.to_string()))?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            if errors.iter().any(|e| is_auth_message(&e.message)) {
                let joined = errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(CallError::Auth(joined));
            }
            return Err(CallError::Graphql(
                errors
                    .into_iter()
                    .map(|e| GraphqlError {
                        message: e.message,
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        body.data
            .ok_or_else(|| CallError::Parse("no data in response".to_string()))
    }

    async fn mint_token(
        &self,
        domain: &str,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<MintedToken, CallError> {
        let endpoint = format!("https://{domain}/admin/oauth/access_token");

        let response = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({
                "client_id": client_id,
                "client_secret": client_secret.expose_secret(),
                "grant_type": "client_credentials",
            }))
            .send()
            .await
            .map_err(CallError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CallError::Refresh(format!(
                "issuance endpoint returned {status}: {text}"
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| CallError::Parse(e.to_string()))?;

        Ok(MintedToken {
            access_token: token.access_token,
            expires_in_secs: token.expires_in,
        })
    }
}
