//! Product routes: create, fetch, update, and delete landing-page products.
//!
//! Creation follows the original submission flow: create the product with
//! its option axes, bulk-create the expanded variants, write the landing
//! content metafields, then publish to every sales channel best-effort -
//! individual channel failures are collected, not fatal.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{instrument, warn};

use prolanding_core::variants::{
    SelectedOption, VariantCombination, VariantOption, extract_options, validate_options,
    variant_bulk_input,
};
use prolanding_core::{ProductStatus, ShopId};

use crate::error::AppError;
use crate::gemini::LandingContent;
use crate::shopify::client::check_user_errors;
use crate::shopify::queries;
use crate::state::AppState;

const LANDING_NAMESPACE: &str = "landing";
const DEFAULT_TEMPLATE_SUFFIX: &str = "landing";

// =============================================================================
// Request / response types
// =============================================================================

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub shop_id: ShopId,
    pub title: String,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    /// Theme template suffix; defaults to the landing template.
    #[serde(default)]
    pub template_suffix: Option<String>,
    /// Option axes; empty means a single default variant.
    #[serde(default)]
    pub options: Vec<VariantOption>,
    /// Expanded combinations with operator-edited prices.
    #[serde(default)]
    pub variants: Vec<VariantCombination>,
    /// Landing-page copy written as metafields.
    #[serde(default)]
    pub content: Option<LandingContent>,
    /// Publish to sales channels after creation.
    #[serde(default = "default_publish")]
    pub publish: bool,
}

const fn default_publish() -> bool {
    true
}

/// Response for a created product.
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub id: String,
    pub handle: Option<String>,
    /// Whether any channel publication was attempted.
    pub published: bool,
    /// Channels that failed to publish; empty on full success.
    pub failed_channels: Vec<String>,
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub shop_id: ShopId,
    #[serde(default)]
    pub first: Option<i64>,
    #[serde(default)]
    pub query: Option<String>,
}

/// Query parameter shared by show/update/destroy.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub shop_id: ShopId,
}

/// Request body carrying only the shop reference.
#[derive(Debug, Deserialize)]
pub struct ShopBody {
    pub shop_id: ShopId,
}

/// Editable model of an existing remote product.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Value,
    /// Option model reconstructed from the remote variants.
    pub options: Vec<VariantOption>,
    pub variants: Vec<VariantCombination>,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub shop_id: ShopId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub template_suffix: Option<String>,
    /// Updated landing content, rewritten as metafields.
    #[serde(default)]
    pub content: Option<LandingContent>,
    /// Variant price/SKU edits; each entry must carry its `remote_id`.
    #[serde(default)]
    pub variants: Vec<VariantCombination>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Product listing, proxied from the Admin API.
#[instrument(skip(state, params), fields(shop = %params.shop_id))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let data = state
        .shopify()
        .request(
            params.shop_id,
            queries::PRODUCTS_LIST,
            json!({
                "first": params.first.unwrap_or(25),
                "query": params.query,
            }),
        )
        .await?;

    Ok(Json(data.get("products").cloned().unwrap_or(Value::Null)))
}

/// Create a landing-page product.
#[instrument(skip(state, request), fields(shop = %request.shop_id, title = %request.title))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<CreateProductResponse>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }
    if !request.options.is_empty() {
        validate_options(&request.options)?;
    }
    validate_prices(&request.variants)?;

    let shop_id = request.shop_id;

    // 1. Create the product (with its option axes when variants follow).
    let mut input = json!({
        "title": request.title,
        "status": request.status.unwrap_or_default().as_str(),
        "templateSuffix": request
            .template_suffix
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE_SUFFIX),
    });
    if let Some(map) = input.as_object_mut() {
        if let Some(description) = &request.description_html {
            map.insert("descriptionHtml".into(), json!(description));
        }
        if let Some(vendor) = &request.vendor {
            map.insert("vendor".into(), json!(vendor));
        }
        if !request.options.is_empty() {
            map.insert(
                "productOptions".into(),
                json!(
                    request
                        .options
                        .iter()
                        .map(|opt| json!({
                            "name": opt.name,
                            "values": opt.values.iter().map(|v| json!({ "name": v })).collect::<Vec<_>>(),
                        }))
                        .collect::<Vec<_>>()
                ),
            );
        }
    }

    let data = state
        .shopify()
        .request(shop_id, queries::PRODUCT_CREATE, json!({ "input": input }))
        .await?;
    check_user_errors(&data, "productCreate")?;

    let product_id = data
        .pointer("/productCreate/product/id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Internal("product id missing from create response".to_string()))?
        .to_string();
    let handle = data
        .pointer("/productCreate/product/handle")
        .and_then(Value::as_str)
        .map(str::to_string);

    // 2. Bulk-create the expanded variants.
    if !request.variants.is_empty() {
        let location_id = primary_location(&state, shop_id).await;
        let inputs: Vec<Value> = request
            .variants
            .iter()
            .map(|v| variant_bulk_input(v, location_id.as_deref()))
            .collect();

        let data = state
            .shopify()
            .request(
                shop_id,
                queries::PRODUCT_VARIANTS_BULK_CREATE,
                json!({ "productId": product_id, "variants": inputs }),
            )
            .await?;
        check_user_errors(&data, "productVariantsBulkCreate")?;
    }

    // 3. Write the landing content as metafields.
    if let Some(content) = &request.content {
        set_landing_metafields(&state, shop_id, &product_id, content).await?;
    }

    // 4. Best-effort channel publication: keep going past failures and
    //    report what did not make it.
    let mut failed_channels = Vec::new();
    if request.publish {
        failed_channels = publish_to_all_channels(&state, shop_id, &product_id).await;
    }

    Ok(Json(CreateProductResponse {
        id: product_id,
        handle,
        published: request.publish,
        failed_channels,
    }))
}

/// Fetch a product and fold its variants back into the editable model.
#[instrument(skip(state, params), fields(shop = %params.shop_id, product = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ShopQuery>,
) -> Result<Json<ProductDetail>, AppError> {
    let data = state
        .shopify()
        .request(
            params.shop_id,
            queries::PRODUCT_FULL,
            json!({ "id": product_gid(&id) }),
        )
        .await?;

    let product = data.get("product").cloned().unwrap_or(Value::Null);
    if product.is_null() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    let variants = parse_remote_variants(&product);
    let options = extract_options(&variants);

    Ok(Json(ProductDetail {
        product,
        options,
        variants,
    }))
}

/// Update product fields and variant prices.
#[instrument(skip(state, request), fields(shop = %request.shop_id, product = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Value>, AppError> {
    validate_prices(&request.variants)?;

    let shop_id = request.shop_id;
    let gid = product_gid(&id);

    let mut input = json!({ "id": gid });
    if let Some(map) = input.as_object_mut() {
        if let Some(title) = &request.title {
            map.insert("title".into(), json!(title));
        }
        if let Some(description) = &request.description_html {
            map.insert("descriptionHtml".into(), json!(description));
        }
        if let Some(vendor) = &request.vendor {
            map.insert("vendor".into(), json!(vendor));
        }
        if let Some(status) = request.status {
            map.insert("status".into(), json!(status.as_str()));
        }
        if let Some(suffix) = &request.template_suffix {
            map.insert("templateSuffix".into(), json!(suffix));
        }
    }

    let data = state
        .shopify()
        .request(shop_id, queries::PRODUCT_UPDATE, json!({ "input": input }))
        .await?;
    check_user_errors(&data, "productUpdate")?;

    if !request.variants.is_empty() {
        let mut inputs = Vec::with_capacity(request.variants.len());
        for variant in &request.variants {
            let remote_id = variant.remote_id.as_deref().ok_or_else(|| {
                AppError::BadRequest(
                    "variant updates require the remote variant id".to_string(),
                )
            })?;
            let mut entry = json!({ "id": remote_id, "price": variant.price });
            if let Some(map) = entry.as_object_mut() {
                if let Some(compare_at) = &variant.compare_at_price {
                    map.insert("compareAtPrice".into(), json!(compare_at));
                }
                if let Some(sku) = variant.sku.as_deref().filter(|s| !s.is_empty()) {
                    map.insert("inventoryItem".into(), json!({ "sku": sku }));
                }
            }
            inputs.push(entry);
        }

        let data = state
            .shopify()
            .request(
                shop_id,
                queries::PRODUCT_VARIANTS_BULK_UPDATE,
                json!({ "productId": gid, "variants": inputs }),
            )
            .await?;
        check_user_errors(&data, "productVariantsBulkUpdate")?;
    }

    if let Some(content) = &request.content {
        set_landing_metafields(&state, shop_id, &gid, content).await?;
    }

    Ok(Json(json!({ "id": gid })))
}

/// Remove a product from every sales channel, best-effort like publishing.
#[instrument(skip(state, request), fields(shop = %request.shop_id, product = %id))]
pub async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ShopBody>,
) -> Result<Json<Value>, AppError> {
    let gid = product_gid(&id);
    let failed_channels = for_each_channel(
        &state,
        request.shop_id,
        &gid,
        queries::UNPUBLISH_PRODUCT,
        "publishableUnpublish",
    )
    .await;

    Ok(Json(json!({ "id": gid, "failed_channels": failed_channels })))
}

/// Delete a product.
#[instrument(skip(state, params), fields(shop = %params.shop_id, product = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ShopQuery>,
) -> Result<Json<Value>, AppError> {
    let data = state
        .shopify()
        .request(
            params.shop_id,
            queries::PRODUCT_DELETE,
            json!({ "input": { "id": product_gid(&id) } }),
        )
        .await?;
    check_user_errors(&data, "productDelete")?;

    Ok(Json(json!({
        "deleted_product_id": data
            .pointer("/productDelete/deletedProductId")
            .cloned()
            .unwrap_or(Value::Null),
    })))
}

// =============================================================================
// Helpers
// =============================================================================

/// Accept either a bare numeric id or a full gid.
pub(super) fn product_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("gid://shopify/Product/{id}")
    }
}

/// Every price field must be a non-negative decimal string.
fn validate_prices(variants: &[VariantCombination]) -> Result<(), AppError> {
    for variant in variants {
        for price in std::iter::once(variant.price.as_str())
            .chain(variant.compare_at_price.as_deref())
        {
            let value = Decimal::from_str(price).map_err(|_| {
                AppError::BadRequest(format!("invalid price \"{price}\""))
            })?;
            if value.is_sign_negative() {
                return Err(AppError::BadRequest(format!(
                    "price \"{price}\" must not be negative"
                )));
            }
        }
    }
    Ok(())
}

/// First inventory location id, if the shop reports one. Failures fall back
/// to creating variants without initial quantities.
async fn primary_location(state: &AppState, shop_id: ShopId) -> Option<String> {
    match state
        .shopify()
        .request(shop_id, queries::PRIMARY_LOCATION, json!({}))
        .await
    {
        Ok(data) => data
            .pointer("/locations/edges/0/node/id")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(error) => {
            warn!(shop = %shop_id, %error, "could not resolve primary location");
            None
        }
    }
}

/// Metafield type for a landing content key. Star counts are integers,
/// long-form copy is multi-line, everything else is a single line.
fn landing_metafield_type(key: &str) -> &'static str {
    if key.ends_with("_stars") {
        "number_integer"
    } else if key == "description" || key == "hero_subtitle" || key.ends_with("_text") {
        "multi_line_text_field"
    } else {
        "single_line_text_field"
    }
}

/// Build the `MetafieldsSetInput` entries for the non-empty content fields.
fn landing_metafields(product_id: &str, content: &LandingContent) -> Vec<Value> {
    content
        .fields()
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            json!({
                "ownerId": product_id,
                "namespace": LANDING_NAMESPACE,
                "key": key,
                "type": landing_metafield_type(key),
                "value": value,
            })
        })
        .collect()
}

/// Write the landing content fields as product metafields.
async fn set_landing_metafields(
    state: &AppState,
    shop_id: ShopId,
    product_id: &str,
    content: &LandingContent,
) -> Result<(), AppError> {
    let metafields = landing_metafields(product_id, content);
    if metafields.is_empty() {
        return Ok(());
    }

    let data = state
        .shopify()
        .request(
            shop_id,
            queries::METAFIELDS_SET,
            json!({ "metafields": metafields }),
        )
        .await?;
    check_user_errors(&data, "metafieldsSet")?;
    Ok(())
}

/// Publish the product to every sales channel, continuing past individual
/// failures. Returns the names of channels that failed.
async fn publish_to_all_channels(
    state: &AppState,
    shop_id: ShopId,
    product_id: &str,
) -> Vec<String> {
    for_each_channel(state, shop_id, product_id, queries::PUBLISH_PRODUCT, "publishablePublish")
        .await
}

/// Run a publication mutation against every sales channel, continuing past
/// individual failures. Returns the names of channels that failed.
async fn for_each_channel(
    state: &AppState,
    shop_id: ShopId,
    product_id: &str,
    mutation: &str,
    mutation_name: &str,
) -> Vec<String> {
    let publications = match state
        .shopify()
        .request(shop_id, queries::GET_PUBLICATIONS, json!({}))
        .await
    {
        Ok(data) => data
            .pointer("/publications/edges")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        Err(error) => {
            warn!(shop = %shop_id, %error, "could not list sales channels");
            return vec!["(channel lookup failed)".to_string()];
        }
    };

    let mut failed = Vec::new();
    for edge in &publications {
        let Some(publication_id) = edge.pointer("/node/id").and_then(Value::as_str) else {
            continue;
        };
        let name = edge
            .pointer("/node/name")
            .and_then(Value::as_str)
            .unwrap_or(publication_id);

        let result = state
            .shopify()
            .request(
                shop_id,
                mutation,
                json!({
                    "id": product_id,
                    "input": [{ "publicationId": publication_id }],
                }),
            )
            .await
            .and_then(|data| check_user_errors(&data, mutation_name));

        if let Err(error) = result {
            warn!(shop = %shop_id, channel = %name, %error, "channel publication change failed");
            failed.push(name.to_string());
        }
    }

    failed
}

/// Fold remote variant nodes back into the editable combination model.
fn parse_remote_variants(product: &Value) -> Vec<VariantCombination> {
    product
        .pointer("/variants/edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .map(|node| VariantCombination {
                    selected_options: node
                        .get("selectedOptions")
                        .and_then(Value::as_array)
                        .map(|selected| {
                            selected
                                .iter()
                                .filter_map(|opt| {
                                    Some(SelectedOption::new(
                                        opt.get("name")?.as_str()?,
                                        opt.get("value")?.as_str()?,
                                    ))
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                    price: node
                        .get("price")
                        .and_then(Value::as_str)
                        .unwrap_or("0.00")
                        .to_string(),
                    compare_at_price: node
                        .get("compareAtPrice")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    sku: node.get("sku").and_then(Value::as_str).map(str::to_string),
                    inventory_quantity: node.get("inventoryQuantity").and_then(Value::as_i64),
                    media_id: None,
                    remote_id: node.get("id").and_then(Value::as_str).map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}
