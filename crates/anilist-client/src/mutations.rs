//! User-facing AniList mutations.
//!
//! Thin wrappers over [`AniListClient::execute`] that reduce each response to
//! the outcome the caller acts on: a success flag, a typed object, or a
//! message to show the user.

use crate::api::types::*;
use crate::api::{AniListClient, ExecuteOptions};
use crate::error::Result;
use crate::operations::*;
use tracing::{info, warn};

/// Message returned when a posting mutation reports no errors
pub const SUCCESS_MESSAGE: &str = "Success";

/// Mutation helpers bound to a client
#[derive(Debug, Clone)]
pub struct AniListMutations {
    client: AniListClient,
}

impl AniListMutations {
    pub fn new(client: AniListClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AniListClient {
        &self.client
    }

    /// Toggle an anime (`anime = true`) or manga favourite
    pub async fn toggle_favourite(&self, anime: bool, id: i64) -> bool {
        let result = self
            .client
            .execute(&ToggleFavouriteById { anime, id }, ExecuteOptions::default())
            .await;
        succeeded("ToggleFavouriteById", result)
    }

    /// Toggle a favourite of the given kind
    pub async fn toggle_fav(&self, kind: FavType, id: i64) -> bool {
        let result = self
            .client
            .execute(&ToggleFavourite { kind, id }, ExecuteOptions::default())
            .await;
        succeeded("ToggleFavourite", result)
    }

    /// Save a list entry, sending only the fields that are set
    pub async fn edit_list(&self, edit: &ListEntryEdit) -> bool {
        let result = self.client.execute(edit, ExecuteOptions::show()).await;
        if let Ok(response) = &result {
            if let Some(entry) = response.data.as_ref().and_then(|d| d.entry.as_ref()) {
                info!(
                    media_id = edit.media_id,
                    score = ?entry.score,
                    "List entry saved"
                );
            }
        }
        succeeded("SaveMediaListEntry", result)
    }

    /// Delete a list entry by its list id
    pub async fn delete_list(&self, list_id: i64) -> bool {
        let result = self
            .client
            .execute(&DeleteMediaListEntry { id: list_id }, ExecuteOptions::default())
            .await;

        match result {
            Ok(response) if response.is_success() => response
                .data
                .and_then(|d| d.result)
                .and_then(|r| r.deleted)
                .unwrap_or(true),
            other => succeeded("DeleteMediaListEntry", other),
        }
    }

    /// Vote on a review, returning the updated review
    pub async fn rate_review(&self, review_id: i64, rating: ReviewRating) -> Option<Review> {
        let result = self
            .client
            .execute(&RateReview { review_id, rating }, ExecuteOptions::default())
            .await;

        match result {
            Ok(response) => {
                if let Some(errors) = &response.errors {
                    warn!(review_id, errors = %errors, "RateReview returned errors");
                }
                response.data.and_then(|d| d.review)
            }
            Err(e) => {
                warn!(review_id, error = %e, "RateReview failed");
                None
            }
        }
    }

    /// Post a text activity
    pub async fn post_activity(&self, text: &str) -> String {
        let operation = SaveTextActivity {
            text: text.to_string(),
        };
        let result = self.client.execute(&operation, ExecuteOptions::default()).await;
        outcome_message(result)
    }

    /// Publish a review
    pub async fn post_review(&self, summary: &str, body: &str, media_id: i64, score: i32) -> String {
        let operation = SaveReview {
            media_id,
            summary: summary.to_string(),
            body: body.to_string(),
            score,
        };
        let result = self.client.execute(&operation, ExecuteOptions::default()).await;
        outcome_message(result)
    }

    /// Reply to an activity
    pub async fn post_reply(&self, activity_id: i64, text: &str) -> String {
        let operation = SaveActivityReply {
            activity_id,
            text: text.to_string(),
        };
        let result = self.client.execute(&operation, ExecuteOptions::default()).await;
        outcome_message(result)
    }

    /// Read a page of the most popular anime
    pub async fn top_anime(&self, page: u32, per_page: u32) -> Result<Page> {
        let response = self
            .client
            .execute(&TopAnime { page, per_page }, ExecuteOptions::default())
            .await?;

        Ok(response
            .data
            .map(|d| d.page)
            .unwrap_or(Page { media: Vec::new() }))
    }
}

/// True when the call went through and the response has no `errors`
fn succeeded<T>(operation: &str, result: Result<GraphQlResponse<T>>) -> bool {
    match result {
        Ok(response) => {
            if let Some(errors) = &response.errors {
                warn!(operation, errors = %errors, "Mutation returned errors");
            }
            response.is_success()
        }
        Err(e) => {
            warn!(operation, error = %e, "Mutation failed");
            false
        }
    }
}

/// The raw `errors` JSON when present, the error text when the call failed,
/// otherwise [`SUCCESS_MESSAGE`]
fn outcome_message<T>(result: Result<GraphQlResponse<T>>) -> String {
    match result {
        Ok(GraphQlResponse {
            errors: Some(errors),
            ..
        }) => errors.to_string(),
        Ok(_) => SUCCESS_MESSAGE.to_string(),
        Err(e) => e.to_string(),
    }
}
