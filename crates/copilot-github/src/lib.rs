//! GitHub identity resolution for the copilot agent.
//!
//! The webhook hands the caller's bearer token to this crate and gets back
//! the account behind it. Exposes the `IdentityProvider` capability trait
//! plus its production implementation against the GitHub REST API, so the
//! HTTP layer and tests can swap the remote call for a double.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{ClientConfig, GithubClient, GithubUser, IdentityProvider};
pub use error::{GithubError, Result};
