//! Content generation routes backed by the Gemini client.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::gemini::{FieldAction, GenerationOptions, LandingContent, ProductBrief};
use crate::state::AppState;

const DEFAULT_TITLE_COUNT: usize = 5;
const MAX_TITLE_COUNT: usize = 10;

/// Request body for full landing-page generation.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub brief: ProductBrief,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

/// Request body for single-field assistance.
#[derive(Debug, Deserialize)]
pub struct FieldRequest {
    /// Human-readable label of the field being edited.
    pub field: String,
    /// Short description of the product for context.
    pub context: String,
    #[serde(default)]
    pub current_value: Option<String>,
    pub action: FieldAction,
}

#[derive(Debug, Serialize)]
pub struct FieldResponse {
    pub value: String,
}

/// Request body for title suggestions.
#[derive(Debug, Deserialize)]
pub struct TitlesRequest {
    pub description: String,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}

/// Generate the full set of landing-page fields from a product brief.
#[instrument(skip(state, request), fields(product = %request.brief.name))]
pub async fn landing(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<LandingContent>, AppError> {
    if request.brief.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "product name must not be empty".to_string(),
        ));
    }

    let content = state
        .gemini()
        .generate_landing_content(&request.brief, &request.options)
        .await?;
    Ok(Json(content))
}

/// Rewrite a single field under an operator-chosen action.
#[instrument(skip(state, request), fields(field = %request.field, action = ?request.action))]
pub async fn field(
    State(state): State<AppState>,
    Json(request): Json<FieldRequest>,
) -> Result<Json<FieldResponse>, AppError> {
    if request.field.trim().is_empty() {
        return Err(AppError::BadRequest("field must not be empty".to_string()));
    }

    let value = state
        .gemini()
        .assist_field(
            &request.field,
            &request.context,
            request.current_value.as_deref(),
            request.action,
        )
        .await?;
    Ok(Json(FieldResponse { value }))
}

/// Suggest alternative product titles.
#[instrument(skip(state, request))]
pub async fn titles(
    State(state): State<AppState>,
    Json(request): Json<TitlesRequest>,
) -> Result<Json<TitlesResponse>, AppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "description must not be empty".to_string(),
        ));
    }

    let count = request
        .count
        .unwrap_or(DEFAULT_TITLE_COUNT)
        .clamp(1, MAX_TITLE_COUNT);

    let titles = state
        .gemini()
        .suggest_titles(&request.description, count)
        .await?;
    Ok(Json(TitlesResponse { titles }))
}
