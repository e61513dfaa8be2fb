//! AniList client library.
//!
//! Executes typed AniList GraphQL operations (favourites, list entries,
//! reviews, activities) and reads a degraded top-anime list from the Jikan
//! API when AniList reads fail.

pub mod api;
pub mod cache;
pub mod error;
pub mod fallback;
pub mod mutations;
pub mod operations;
pub mod sanitize;

pub use api::{AniListClient, ExecuteOptions, RateLimitState};
pub use cache::ResponseCache;
pub use error::{AniListError, Result};
pub use fallback::JikanFallback;
pub use mutations::AniListMutations;
pub use operations::{ListEntryEdit, Operation, OperationKind};
