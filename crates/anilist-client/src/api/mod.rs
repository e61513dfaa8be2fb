//! AniList GraphQL API client.
//!
//! This module provides a paced, retry-enabled executor for AniList
//! operations along with the request and response types it speaks.

pub mod client;
pub mod rate_limiter;
pub mod types;

pub use client::{AniListClient, ExecuteOptions};
pub use rate_limiter::{RateLimitState, RateLimiter};
pub use types::*;
