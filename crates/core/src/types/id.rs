//! Newtype IDs for type-safe entity references.

use serde::{Deserialize, Serialize};

/// Identifier for a configured shop (one remote storefront account).
///
/// Wraps the database primary key so shop references cannot be mixed up
/// with other integer values.
///
/// # Example
///
/// ```rust
/// # use prolanding_core::ShopId;
/// let shop_id = ShopId::new(1);
/// assert_eq!(shop_id.as_i32(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(i32);

impl ShopId {
    /// Create a new shop ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for ShopId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ShopId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ShopId> for i32 {
    fn from(id: ShopId) -> Self {
        id.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShopId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for ShopId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShopId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i32 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_id_roundtrip() {
        let id = ShopId::new(42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(ShopId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_shop_id_serde_transparent() {
        let id = ShopId::new(7);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "7");
        let back: ShopId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
