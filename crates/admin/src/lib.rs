//! ProLanding admin library.
//!
//! Backend for the landing-page product builder: variant expansion and
//! validation, per-shop Shopify Admin API access with token refresh, and
//! Gemini-backed content generation, exposed over an Axum JSON API.
//!
//! The binary in `main.rs` wires this together; the CLI reuses the shop
//! repository and Shopify client directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod gemini;
pub mod routes;
pub mod shopify;
pub mod state;
