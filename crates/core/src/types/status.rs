//! Status enums shared across components.

use serde::{Deserialize, Serialize};

/// Product status as understood by the Shopify Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Visible and purchasable once published to a channel.
    #[default]
    Active,
    /// Saved but not visible on any channel.
    Draft,
    /// Removed from sale but kept for records.
    Archived,
}

impl ProductStatus {
    /// The string form the Admin API expects in mutation input.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Draft => "DRAFT",
            Self::Archived => "ARCHIVED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_serde_screaming() {
        let json = serde_json::to_string(&ProductStatus::Active).expect("serialize");
        assert_eq!(json, "\"ACTIVE\"");
        let back: ProductStatus = serde_json::from_str("\"DRAFT\"").expect("deserialize");
        assert_eq!(back, ProductStatus::Draft);
    }

    #[test]
    fn test_as_str_matches_serde() {
        assert_eq!(ProductStatus::Archived.as_str(), "ARCHIVED");
    }
}
