//! Variant option math: cartesian-product expansion, platform-limit
//! validation, and reconciliation of edited combinations.
//!
//! Everything in this module is pure and total over well-typed input. The
//! only failures are the structured [`OptionValidationError`] values - no
//! function here performs I/O or panics.
//!
//! # Example
//!
//! ```rust
//! use prolanding_core::variants::{VariantOption, generate_combinations};
//!
//! let options = vec![
//!     VariantOption::new("Size", ["M", "L"]),
//!     VariantOption::new("Color", ["Red", "Blue"]),
//! ];
//!
//! let combos = generate_combinations(&options);
//! assert_eq!(combos.len(), 4);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shopify allows at most this many option axes per product.
pub const MAX_OPTIONS: usize = 3;

/// Shopify allows at most this many variants per product.
pub const MAX_VARIANTS: usize = 100;

/// One axis of product variation, e.g. "Size" with values `["S", "M", "L"]`.
///
/// Options exist only while building a product submission; they are not
/// persisted independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Option name, unique among its siblings.
    pub name: String,
    /// Ordered list of possible values.
    pub values: Vec<String>,
}

impl VariantOption {
    /// Convenience constructor used heavily in tests and the CLI.
    pub fn new<N, V, I>(name: N, values: I) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = V>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One `(name, value)` pair of a concrete variant, mirroring the Admin API's
/// `selectedOptions` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g. "Size").
    pub name: String,
    /// The chosen value for this variant (e.g. "M").
    pub value: String,
}

impl SelectedOption {
    /// Create a new selected-option pair.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One sellable variant: a complete assignment of exactly one value per
/// option, plus the operator-edited commercial fields.
///
/// The assignment is kept in option declaration order so the display label
/// and structural identity both follow directly from the representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VariantCombination {
    /// The point in the option product space this variant occupies.
    pub selected_options: Vec<SelectedOption>,
    /// Price as a decimal string (e.g. "29.99").
    pub price: String,
    /// Optional compare-at (strikethrough) price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    /// Optional stock-keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Optional available inventory quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
    /// Optional media id to associate with this variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    /// Remote variant id, present when this combination already exists
    /// on the platform (e.g. `gid://shopify/ProductVariant/123`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// Structured validation failures for an option set.
///
/// These are locally recoverable: the caller blocks submission and shows the
/// specific violation to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionValidationError {
    /// More option axes than the platform allows.
    #[error("too many options ({count}): the platform allows at most {MAX_OPTIONS}")]
    TooManyOptions {
        /// Number of options supplied.
        count: usize,
    },

    /// An option has an empty or blank name.
    #[error("every option must have a name")]
    UnnamedOption,

    /// An option has no values.
    #[error("option \"{name}\" must have at least one value")]
    EmptyOption {
        /// Name of the offending option.
        name: String,
    },

    /// The option product space exceeds the platform's variant ceiling.
    #[error("too many combinations ({count}): the platform allows at most {MAX_VARIANTS} variants")]
    TooManyCombinations {
        /// Total number of combinations the options would produce.
        count: usize,
    },
}

/// Validate an option set against the platform limits.
///
/// Checks run in a fixed order and the first violation is returned: option
/// count, then per-option name and values, then total combination count.
/// The total is computed with `max(len, 1)` per option so an empty option
/// never contributes a zero multiplier.
///
/// # Errors
///
/// Returns the first [`OptionValidationError`] encountered.
pub fn validate_options(options: &[VariantOption]) -> Result<(), OptionValidationError> {
    if options.len() > MAX_OPTIONS {
        return Err(OptionValidationError::TooManyOptions {
            count: options.len(),
        });
    }

    for opt in options {
        if opt.name.trim().is_empty() {
            return Err(OptionValidationError::UnnamedOption);
        }
        if opt.values.is_empty() {
            return Err(OptionValidationError::EmptyOption {
                name: opt.name.clone(),
            });
        }
    }

    let total: usize = options
        .iter()
        .map(|opt| opt.values.len().max(1))
        .product();

    if total > MAX_VARIANTS {
        return Err(OptionValidationError::TooManyCombinations { count: total });
    }

    Ok(())
}

/// Expand an option set into every concrete variant assignment.
///
/// Options with no values are filtered out before expansion so an empty axis
/// does not collapse the whole result. Output order is lexicographic in the
/// order options and values were supplied; callers rely on this for stable
/// display and for matching previously saved combinations.
#[must_use]
pub fn generate_combinations(options: &[VariantOption]) -> Vec<Vec<SelectedOption>> {
    let mut combinations: Vec<Vec<SelectedOption>> = Vec::new();

    for opt in options.iter().filter(|opt| !opt.values.is_empty()) {
        if combinations.is_empty() {
            combinations = opt
                .values
                .iter()
                .map(|value| vec![SelectedOption::new(&opt.name, value)])
                .collect();
            continue;
        }

        let mut expanded = Vec::with_capacity(combinations.len() * opt.values.len());
        for combo in &combinations {
            for value in &opt.values {
                let mut next = combo.clone();
                next.push(SelectedOption::new(&opt.name, value));
                expanded.push(next);
            }
        }
        combinations = expanded;
    }

    combinations
}

/// Expand options into full [`VariantCombination`] rows with default pricing.
#[must_use]
pub fn generate_variants_with_defaults(
    options: &[VariantOption],
    default_price: &str,
    default_compare_at_price: Option<&str>,
) -> Vec<VariantCombination> {
    generate_combinations(options)
        .into_iter()
        .map(|selected_options| VariantCombination {
            selected_options,
            price: default_price.to_string(),
            compare_at_price: default_compare_at_price.map(str::to_string),
            sku: Some(String::new()),
            inventory_quantity: Some(0),
            media_id: None,
            remote_id: None,
        })
        .collect()
}

/// Format the display label for a combination: values joined with `" / "`,
/// e.g. `"M / Red"`.
///
/// # Known limitation
///
/// Two different assignments whose values contain the literal `" / "`
/// separator can format to the same label. The label is therefore display
/// only; identity comparison (see [`merge_existing`]) is structural.
#[must_use]
pub fn combination_label(selected_options: &[SelectedOption]) -> String {
    selected_options
        .iter()
        .map(|opt| opt.value.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Reconcile freshly regenerated combinations with previously edited ones.
///
/// Any regenerated combination whose assignment structurally equals a
/// previous combination keeps that combination's price, compare-at price,
/// SKU, inventory, media and remote ids. New points in the product space
/// keep their defaults.
#[must_use]
pub fn merge_existing(
    regenerated: Vec<VariantCombination>,
    previous: &[VariantCombination],
) -> Vec<VariantCombination> {
    regenerated
        .into_iter()
        .map(|mut combo| {
            if let Some(existing) = previous
                .iter()
                .find(|prev| prev.selected_options == combo.selected_options)
            {
                combo.price = existing.price.clone();
                combo.compare_at_price = existing.compare_at_price.clone();
                combo.sku = existing.sku.clone();
                combo.inventory_quantity = existing.inventory_quantity;
                combo.media_id = existing.media_id.clone();
                combo.remote_id = existing.remote_id.clone();
            }
            combo
        })
        .collect()
}

/// Reconstruct the option model from a flat list of existing variants.
///
/// Accumulates, per option name, the distinct values seen across all
/// variants, in first-seen order. Used when importing a remote product's
/// variant structure back into the editable model.
#[must_use]
pub fn extract_options(variants: &[VariantCombination]) -> Vec<VariantOption> {
    let mut options: Vec<VariantOption> = Vec::new();

    for variant in variants {
        for selected in &variant.selected_options {
            match options.iter_mut().find(|opt| opt.name == selected.name) {
                Some(opt) => {
                    if !opt.values.contains(&selected.value) {
                        opt.values.push(selected.value.clone());
                    }
                }
                None => options.push(VariantOption {
                    name: selected.name.clone(),
                    values: vec![selected.value.clone()],
                }),
            }
        }
    }

    options
}

/// Build the `ProductVariantsBulkInput` JSON object for one combination.
///
/// `location_id` is required by the API whenever an inventory quantity is
/// supplied; when absent the inventory block is omitted.
#[must_use]
pub fn variant_bulk_input(
    variant: &VariantCombination,
    location_id: Option<&str>,
) -> serde_json::Value {
    let mut input = serde_json::json!({
        "price": variant.price,
        "optionValues": variant
            .selected_options
            .iter()
            .map(|opt| serde_json::json!({ "optionName": opt.name, "name": opt.value }))
            .collect::<Vec<_>>(),
    });

    if let Some(map) = input.as_object_mut() {
        if let Some(compare_at) = &variant.compare_at_price {
            map.insert("compareAtPrice".into(), serde_json::json!(compare_at));
        }
        if let Some(sku) = variant.sku.as_deref().filter(|s| !s.is_empty()) {
            map.insert(
                "inventoryItem".into(),
                serde_json::json!({ "sku": sku }),
            );
        }
        if let (Some(quantity), Some(location)) = (variant.inventory_quantity, location_id) {
            map.insert(
                "inventoryQuantities".into(),
                serde_json::json!({
                    "availableQuantity": quantity,
                    "locationId": location,
                }),
            );
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_color() -> Vec<VariantOption> {
        vec![
            VariantOption::new("Size", ["S", "M", "L"]),
            VariantOption::new("Color", ["Red", "Blue"]),
        ]
    }

    #[test]
    fn test_cartesian_product_size() {
        let combos = generate_combinations(&size_color());
        assert_eq!(combos.len(), 6);
    }

    #[test]
    fn test_assignment_completeness() {
        let options = size_color();
        for combo in generate_combinations(&options) {
            assert_eq!(combo.len(), 2);
            for (selected, option) in combo.iter().zip(&options) {
                assert_eq!(selected.name, option.name);
                assert!(option.values.contains(&selected.value));
            }
        }
    }

    #[test]
    fn test_no_duplicate_assignments() {
        let combos = generate_combinations(&size_color());
        let mut labels: Vec<String> =
            combos.iter().map(|c| combination_label(c)).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), combos.len());
    }

    #[test]
    fn test_output_order_is_lexicographic_in_input_order() {
        let combos = generate_combinations(&size_color());
        let labels: Vec<String> = combos.iter().map(|c| combination_label(c)).collect();
        assert_eq!(
            labels,
            vec![
                "S / Red", "S / Blue", "M / Red", "M / Blue", "L / Red", "L / Blue"
            ]
        );
    }

    #[test]
    fn test_empty_value_option_is_filtered_not_collapsing() {
        let options = vec![
            VariantOption::new("Size", ["S", "M"]),
            VariantOption::new("Material", Vec::<String>::new()),
        ];
        let combos = generate_combinations(&options);
        assert_eq!(combos.len(), 2);
        for combo in &combos {
            assert_eq!(combo.len(), 1);
        }
    }

    #[test]
    fn test_no_options_yields_no_combinations() {
        assert!(generate_combinations(&[]).is_empty());
    }

    #[test]
    fn test_validate_option_ceiling() {
        let options = vec![
            VariantOption::new("A", ["1"]),
            VariantOption::new("B", ["1"]),
            VariantOption::new("C", ["1"]),
            VariantOption::new("D", ["1"]),
        ];
        assert_eq!(
            validate_options(&options),
            Err(OptionValidationError::TooManyOptions { count: 4 })
        );
    }

    #[test]
    fn test_validate_unnamed_option() {
        let options = vec![VariantOption::new("  ", ["S"])];
        assert_eq!(
            validate_options(&options),
            Err(OptionValidationError::UnnamedOption)
        );
    }

    #[test]
    fn test_validate_empty_option_names_offender() {
        let options = vec![VariantOption::new("Size", Vec::<String>::new())];
        assert_eq!(
            validate_options(&options),
            Err(OptionValidationError::EmptyOption {
                name: "Size".to_string()
            })
        );
    }

    #[test]
    fn test_validate_combination_ceiling() {
        let eleven: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let options = vec![
            VariantOption::new("A", eleven.clone()),
            VariantOption::new("B", eleven),
        ];
        assert_eq!(
            validate_options(&options),
            Err(OptionValidationError::TooManyCombinations { count: 121 })
        );

        let ten: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let at_limit = vec![
            VariantOption::new("A", ten.clone()),
            VariantOption::new("B", ten),
        ];
        assert_eq!(validate_options(&at_limit), Ok(()));
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(validate_options(&size_color()), Ok(()));
    }

    #[test]
    fn test_defaults_populate_every_combination() {
        let variants = generate_variants_with_defaults(&size_color(), "19.99", Some("29.99"));
        assert_eq!(variants.len(), 6);
        for variant in &variants {
            assert_eq!(variant.price, "19.99");
            assert_eq!(variant.compare_at_price.as_deref(), Some("29.99"));
            assert_eq!(variant.sku.as_deref(), Some(""));
            assert_eq!(variant.inventory_quantity, Some(0));
            assert!(variant.remote_id.is_none());
        }
    }

    #[test]
    fn test_merge_preserves_edits_when_adding_an_option() {
        let before = vec![
            VariantOption::new("Size", ["M"]),
            VariantOption::new("Color", ["Red", "Blue"]),
        ];
        let mut previous = generate_variants_with_defaults(&before, "0.00", None);
        for variant in &mut previous {
            if combination_label(&variant.selected_options) == "M / Red" {
                variant.price = "29.99".to_string();
                variant.sku = Some("TEE-M-RED".to_string());
                variant.remote_id = Some("gid://shopify/ProductVariant/1".to_string());
            }
        }

        // Regenerating the same space keeps the edit.
        let regenerated = generate_variants_with_defaults(&before, "0.00", None);
        let merged = merge_existing(regenerated, &previous);
        let edited = merged
            .iter()
            .find(|v| combination_label(&v.selected_options) == "M / Red")
            .expect("combination present");
        assert_eq!(edited.price, "29.99");
        assert_eq!(edited.sku.as_deref(), Some("TEE-M-RED"));
        assert_eq!(
            edited.remote_id.as_deref(),
            Some("gid://shopify/ProductVariant/1")
        );

        // Adding a third option creates new points which get defaults; the
        // old points no longer exist structurally, so nothing is carried
        // over by accident.
        let after = vec![
            VariantOption::new("Size", ["M"]),
            VariantOption::new("Color", ["Red", "Blue"]),
            VariantOption::new("Material", ["Cotton"]),
        ];
        let merged = merge_existing(generate_variants_with_defaults(&after, "0.00", None), &previous);
        assert_eq!(merged.len(), 2);
        for variant in &merged {
            assert_eq!(variant.price, "0.00");
        }
    }

    #[test]
    fn test_merge_identity_is_structural_not_label() {
        // These two assignments collide as labels but not structurally.
        let previous = vec![VariantCombination {
            selected_options: vec![SelectedOption::new("Size", "M / Red")],
            price: "99.00".to_string(),
            ..VariantCombination::default()
        }];
        let regenerated = vec![VariantCombination {
            selected_options: vec![
                SelectedOption::new("Size", "M"),
                SelectedOption::new("Color", "Red"),
            ],
            price: "0.00".to_string(),
            ..VariantCombination::default()
        }];

        assert_eq!(
            combination_label(&previous.first().expect("one").selected_options),
            combination_label(&regenerated.first().expect("one").selected_options)
        );

        let merged = merge_existing(regenerated, &previous);
        assert_eq!(merged.first().expect("one").price, "0.00");
    }

    #[test]
    fn test_extract_options_inverts_generation() {
        let options = size_color();
        let variants = generate_variants_with_defaults(&options, "0.00", None);
        let derived = extract_options(&variants);

        assert_eq!(derived.len(), options.len());
        for (derived_opt, original) in derived.iter().zip(&options) {
            assert_eq!(derived_opt.name, original.name);
            assert_eq!(derived_opt.values, original.values);
        }
    }

    #[test]
    fn test_variant_bulk_input_shape() {
        let variant = VariantCombination {
            selected_options: vec![
                SelectedOption::new("Size", "M"),
                SelectedOption::new("Color", "Red"),
            ],
            price: "29.99".to_string(),
            compare_at_price: Some("39.99".to_string()),
            sku: Some("TEE-M-RED".to_string()),
            inventory_quantity: Some(5),
            media_id: None,
            remote_id: None,
        };

        let input = variant_bulk_input(&variant, Some("gid://shopify/Location/1"));
        assert_eq!(input["price"], "29.99");
        assert_eq!(input["compareAtPrice"], "39.99");
        assert_eq!(input["inventoryItem"]["sku"], "TEE-M-RED");
        assert_eq!(input["inventoryQuantities"]["availableQuantity"], 5);
        assert_eq!(input["optionValues"][0]["optionName"], "Size");
        assert_eq!(input["optionValues"][0]["name"], "M");

        // No location means no inventory block.
        let without_location = variant_bulk_input(&variant, None);
        assert!(without_location.get("inventoryQuantities").is_none());
    }
}
