//! Variant preview: validation, expansion, and merge of prior edits.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use prolanding_core::variants::{
    self, VariantCombination, VariantOption, combination_label,
};

use crate::error::AppError;

/// Request body for a variant preview.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Option axes as currently edited.
    pub options: Vec<VariantOption>,
    /// Default price for new combinations.
    #[serde(default = "default_price")]
    pub default_price: String,
    /// Default compare-at price for new combinations.
    #[serde(default)]
    pub default_compare_at_price: Option<String>,
    /// Combinations from the previous edit round; matching rows keep their
    /// edited price/SKU/inventory/ids.
    #[serde(default)]
    pub existing: Vec<VariantCombination>,
}

fn default_price() -> String {
    "0.00".to_string()
}

/// One previewed combination with its display label.
#[derive(Debug, Serialize)]
pub struct CombinationView {
    /// Display label, values joined with " / ".
    pub label: String,
    #[serde(flatten)]
    pub combination: VariantCombination,
}

/// Preview response.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub combinations: Vec<CombinationView>,
}

/// Validate the options and expand them into mergeable combinations.
///
/// Validation failures return 422 with the specific violation so the
/// operator can fix the offending option before submitting.
#[instrument(skip(request), fields(options = request.options.len(), existing = request.existing.len()))]
pub async fn preview(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    variants::validate_options(&request.options)?;

    let generated = variants::generate_variants_with_defaults(
        &request.options,
        &request.default_price,
        request.default_compare_at_price.as_deref(),
    );
    let merged = variants::merge_existing(generated, &request.existing);

    Ok(Json(PreviewResponse {
        combinations: merged
            .into_iter()
            .map(|combination| CombinationView {
                label: combination_label(&combination.selected_options),
                combination,
            })
            .collect(),
    }))
}
