//! Gemini-backed landing-page content generation.
//!
//! The rest of the system treats this as an opaque collaborator: it sends a
//! structured prompt, expects structured JSON back, and classifies failures
//! into safety-block, quota, and malformed-output categories so each can be
//! shown to the operator distinctly.

pub mod client;
pub mod error;
pub mod prompts;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{FieldAction, GenerationOptions, LandingContent, ProductBrief, Tone};
