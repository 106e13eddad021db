//! HTTP route handlers for the admin service.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Shops (credential records)
//! GET    /shops                  - List configured shops
//! POST   /shops                  - Register a shop
//!
//! # Variants
//! POST   /variants/preview       - Validate options, expand combinations,
//!                                  merge previously edited rows
//!
//! # Products
//! GET    /products               - Product listing (proxied from Shopify)
//! POST   /products               - Create a landing-page product
//! GET    /products/{id}          - Full product fetch (editable model)
//! PUT    /products/{id}          - Update product fields / variant prices
//! DELETE /products/{id}          - Delete a product
//! POST   /products/{id}/media    - Attach uploaded/external images as media
//! POST   /products/{id}/unpublish - Remove from sales channels (best-effort)
//!
//! # Image uploads
//! POST   /uploads/staged         - Reserve staged upload targets
//! POST   /files                  - Register an uploaded resource as a file
//!
//! # Content generation
//! POST   /generate               - Full landing-page content
//! POST   /generate/field         - Single-field assistance
//! POST   /generate/titles        - Title suggestions
//! ```

pub mod generate;
pub mod media;
pub mod products;
pub mod shops;
pub mod variants;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shops", get(shops::list).post(shops::create))
        .route("/variants/preview", post(variants::preview))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/products/{id}/media", post(media::attach))
        .route("/products/{id}/unpublish", post(products::unpublish))
        .route("/uploads/staged", post(media::staged_upload))
        .route("/files", post(media::create_file))
        .route("/generate", post(generate::landing))
        .route("/generate/field", post(generate::field))
        .route("/generate/titles", post(generate::titles))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
