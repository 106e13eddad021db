//! Core types for ProLanding.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod status;

pub use id::ShopId;
pub use status::ProductStatus;
