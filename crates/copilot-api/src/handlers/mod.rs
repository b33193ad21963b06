//! HTTP request handlers for the copilot webhook.
//!
//! This module contains all HTTP endpoint handlers following a consistent
//! pattern:
//! - Input validation with appropriate error codes
//! - Tracing for observability
//! - Standardized error responses
//!
//! # Handler Organization
//!
//! Handlers are grouped by functionality:
//! - `copilot` - The authenticate-then-stream chat endpoint
//! - `health` - Health check and readiness probes
//!
//! # Security
//!
//! The chat handler authenticates in a fixed order: content type first,
//! then the webhook signature over the raw body, then the bearer token.
//! Bearer tokens are forwarded to GitHub and never logged or persisted.

pub mod copilot;
pub mod health;

// Re-export handlers for convenient access
pub use copilot::copilot_chat;
pub use health::{health_check, liveness_check, readiness_check};
