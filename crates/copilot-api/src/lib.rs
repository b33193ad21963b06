//! Copilot agent HTTP API.
//!
//! Axum surface for the copilot webhook: configuration, signature
//! verification, tagged header extraction, the SSE reply writer, and the
//! handlers that compose them into the authenticate-then-stream pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod server;
pub mod state;
pub mod streaming;

pub use config::Config;
pub use error::CopilotError;
pub use server::{create_router, start_server};
pub use state::{AppState, WebhookConfig};
