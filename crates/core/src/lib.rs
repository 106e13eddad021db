//! ProLanding Core - Shared types library.
//!
//! This crate provides common types used across all ProLanding components:
//! - `admin` - Landing-page builder admin service
//! - `cli` - Command-line tools for migrations and shop management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and product statuses
//! - [`variants`] - Cartesian-product variant generation and validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod variants;

pub use types::*;
