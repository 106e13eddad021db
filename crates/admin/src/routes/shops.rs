//! Shop registration and listing.

use axum::{Json, extract::State};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use prolanding_core::ShopId;

use crate::db::ShopRepository;
use crate::db::shops::{NewShop, ShopRecord};
use crate::error::AppError;
use crate::state::AppState;

/// Request body for registering a shop.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    /// Shop domain (e.g., your-store.myshopify.com).
    pub domain: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Initial access token.
    pub access_token: String,
    /// Seconds until the token expires; absent means long-lived.
    #[serde(default)]
    pub expires_in_secs: Option<i64>,
    /// Client id for token refresh.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Client secret for token refresh.
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Shop view returned to clients. Never includes token material.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub id: ShopId,
    pub domain: String,
    pub name: Option<String>,
    /// Whether the shop can mint fresh tokens on its own.
    pub refreshable: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShopRecord> for ShopView {
    fn from(record: ShopRecord) -> Self {
        Self {
            id: record.id,
            domain: record.domain,
            name: record.name,
            refreshable: record.client_id.is_some() && record.client_secret.is_some(),
            expires_at: record.expires_at,
        }
    }
}

/// List all configured shops.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ShopView>>, AppError> {
    let shops = ShopRepository::new(state.pool()).list().await?;
    Ok(Json(shops.into_iter().map(ShopView::from).collect()))
}

/// Register a new shop.
#[instrument(skip(state, request), fields(domain = %request.domain))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateShopRequest>,
) -> Result<Json<ShopView>, AppError> {
    if request.domain.trim().is_empty() {
        return Err(AppError::BadRequest("domain must not be empty".to_string()));
    }
    if request.access_token.trim().is_empty() {
        return Err(AppError::BadRequest(
            "access_token must not be empty".to_string(),
        ));
    }

    let expires_at = request
        .expires_in_secs
        .map(|secs| Utc::now() + Duration::seconds(secs));

    let record = ShopRepository::new(state.pool())
        .create(NewShop {
            domain: request.domain,
            name: request.name,
            access_token: request.access_token,
            expires_at,
            client_id: request.client_id,
            client_secret: request.client_secret,
        })
        .await?;

    Ok(Json(record.into()))
}
