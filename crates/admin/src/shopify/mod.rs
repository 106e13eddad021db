//! Shopify Admin API client with per-shop credential refresh.
//!
//! # Architecture
//!
//! - [`credentials`] - credential store abstraction and the token refresher
//!   (expiry-buffered refresh, serialized per shop)
//! - [`transport`] - the wire layer: GraphQL execution and token minting,
//!   returning explicit outcomes so the retry decision is made by inspecting
//!   a tag rather than catching exceptions
//! - [`client`] - the request wrapper: one forced refresh and one retry on an
//!   authentication-class failure, everything else propagated immediately
//! - [`queries`] - the GraphQL documents the routes and CLI issue
//!
//! # Example
//!
//! ```rust,ignore
//! use prolanding_admin::shopify::{ShopifyClient, queries};
//!
//! let client = ShopifyClient::http(&config.shopify, store);
//!
//! let data = client
//!     .request(shop_id, queries::PRODUCT_GET, serde_json::json!({ "id": gid }))
//!     .await?;
//! ```

pub mod client;
pub mod credentials;
pub mod queries;
pub mod transport;

pub use client::ShopifyClient;
pub use credentials::{CredentialStore, InMemoryCredentialStore, PgCredentialStore, TokenRefresher};
pub use transport::{CallError, HttpTransport, MintedToken, ShopifyTransport};

use prolanding_core::ShopId;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    Graphql(Vec<GraphqlError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No shop registered under the given id.
    #[error("unknown shop: {0}")]
    UnknownShop(ShopId),

    /// Credential store access failed.
    #[error("credential store error: {0}")]
    Store(#[from] RepositoryError),

    /// Authentication failed and could not be recovered by a refresh.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The credential issuance endpoint rejected the refresh.
    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// Domain-level rejection from a mutation (e.g., duplicate SKU).
    #[error("user error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the Admin API.
#[derive(Debug, Clone)]
pub struct GraphqlError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphqlError {
                message: "Field not found".to_string(),
                path: vec![],
            },
            GraphqlError {
                message: "Invalid ID".to_string(),
                path: vec![],
            },
        ];
        let err = ShopifyError::Graphql(errors);
        assert_eq!(err.to_string(), "GraphQL errors: Field not found; Invalid ID");
    }

    #[test]
    fn test_unknown_shop_display() {
        let err = ShopifyError::UnknownShop(ShopId::new(9));
        assert_eq!(err.to_string(), "unknown shop: 9");
    }

    #[test]
    fn test_user_error_display() {
        let err = ShopifyError::UserError("SKU already in use".to_string());
        assert_eq!(err.to_string(), "user error: SKU already in use");
    }
}
