//! Typed AniList operations.
//!
//! Every operation pairs a fixed GraphQL document with a variables builder
//! and the shape of its `data` payload. Arguments only ever travel as
//! variables, never spliced into the document.

use crate::api::types::*;
use crate::sanitize::encode_astral;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Whether an operation reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A GraphQL operation understood by [`crate::AniListClient`]
pub trait Operation {
    /// Shape of the response `data` field
    type Data: DeserializeOwned;

    /// Operation name, used for logging and cache keys
    const NAME: &'static str;

    const KIND: OperationKind;

    /// GraphQL document
    const DOCUMENT: &'static str;

    fn variables(&self) -> Value;
}

/// Toggle an anime or manga favourite
#[derive(Debug, Clone, Copy)]
pub struct ToggleFavouriteById {
    pub anime: bool,
    pub id: i64,
}

impl Operation for ToggleFavouriteById {
    type Data = Value;
    const NAME: &'static str = "ToggleFavouriteById";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($animeId: Int, $mangaId: Int) { \
        ToggleFavourite(animeId: $animeId, mangaId: $mangaId) { \
        anime { edges { id } } manga { edges { id } } } }";

    fn variables(&self) -> Value {
        if self.anime {
            json!({ "animeId": self.id })
        } else {
            json!({ "mangaId": self.id })
        }
    }
}

/// Toggle a favourite of any [`FavType`]
#[derive(Debug, Clone, Copy)]
pub struct ToggleFavourite {
    pub kind: FavType,
    pub id: i64,
}

impl Operation for ToggleFavourite {
    type Data = Value;
    const NAME: &'static str = "ToggleFavourite";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($animeId: Int, $mangaId: Int, $characterId: Int, \
        $staffId: Int, $studioId: Int) { ToggleFavourite(animeId: $animeId, mangaId: $mangaId, \
        characterId: $characterId, staffId: $staffId, studioId: $studioId) { \
        anime { pageInfo { total } } } }";

    fn variables(&self) -> Value {
        let mut variables = Map::new();
        variables.insert(self.kind.argument().to_string(), json!(self.id));
        Value::Object(variables)
    }
}

/// Create or update a media list entry
///
/// Unset fields are left out of the variables so AniList keeps their
/// current values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListEntryEdit {
    #[serde(rename = "mediaID")]
    pub media_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(rename = "scoreRaw", skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(rename = "start", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<FuzzyDate>,
    #[serde(rename = "completed", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<FuzzyDate>,
    #[serde(rename = "customLists", skip_serializing_if = "Option::is_none")]
    pub custom_lists: Option<Vec<String>>,
}

impl ListEntryEdit {
    pub fn new(media_id: i64) -> Self {
        Self {
            media_id,
            ..Default::default()
        }
    }
}

impl Operation for ListEntryEdit {
    type Data = SaveMediaListEntryData;
    const NAME: &'static str = "SaveMediaListEntry";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($mediaID: Int, $progress: Int, $private: Boolean, \
        $repeat: Int, $notes: String, $customLists: [String], $scoreRaw: Int, \
        $status: MediaListStatus, $start: FuzzyDateInput, $completed: FuzzyDateInput) { \
        SaveMediaListEntry(mediaId: $mediaID, progress: $progress, repeat: $repeat, \
        notes: $notes, private: $private, scoreRaw: $scoreRaw, status: $status, \
        startedAt: $start, completedAt: $completed, customLists: $customLists) { \
        score(format: POINT_10_DECIMAL) startedAt { year month day } \
        completedAt { year month day } } }";

    fn variables(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({ "mediaID": self.media_id }))
    }
}

/// Remove a media list entry
#[derive(Debug, Clone, Copy)]
pub struct DeleteMediaListEntry {
    pub id: i64,
}

impl Operation for DeleteMediaListEntry {
    type Data = DeleteMediaListEntryData;
    const NAME: &'static str = "DeleteMediaListEntry";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str =
        "mutation ($id: Int) { DeleteMediaListEntry(id: $id) { deleted } }";

    fn variables(&self) -> Value {
        json!({ "id": self.id })
    }
}

/// Vote on a review
#[derive(Debug, Clone, Copy)]
pub struct RateReview {
    pub review_id: i64,
    pub rating: ReviewRating,
}

impl Operation for RateReview {
    type Data = RateReviewData;
    const NAME: &'static str = "RateReview";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($reviewId: Int, $rating: ReviewRating) { \
        RateReview(reviewId: $reviewId, rating: $rating) { \
        id mediaId mediaType summary body(asHtml: true) rating ratingAmount userRating \
        score private siteUrl createdAt updatedAt \
        user { id name bannerImage avatar { medium large } } } }";

    fn variables(&self) -> Value {
        json!({ "reviewId": self.review_id, "rating": self.rating.as_str() })
    }
}

/// Publish a review
#[derive(Debug, Clone)]
pub struct SaveReview {
    pub media_id: i64,
    pub summary: String,
    pub body: String,
    pub score: i32,
}

impl Operation for SaveReview {
    type Data = SaveReviewData;
    const NAME: &'static str = "SaveReview";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($mediaId: Int, $summary: String, $body: String, \
        $score: Int) { SaveReview(mediaId: $mediaId, summary: $summary, body: $body, \
        score: $score) { siteUrl } }";

    fn variables(&self) -> Value {
        json!({
            "mediaId": self.media_id,
            "summary": encode_astral(&self.summary),
            "body": encode_astral(&self.body),
            "score": self.score,
        })
    }
}

/// Post a text activity to the user's feed
#[derive(Debug, Clone)]
pub struct SaveTextActivity {
    pub text: String,
}

impl Operation for SaveTextActivity {
    type Data = SaveTextActivityData;
    const NAME: &'static str = "SaveTextActivity";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str =
        "mutation ($text: String) { SaveTextActivity(text: $text) { siteUrl } }";

    fn variables(&self) -> Value {
        json!({ "text": encode_astral(&self.text) })
    }
}

/// Reply to an activity
#[derive(Debug, Clone)]
pub struct SaveActivityReply {
    pub activity_id: i64,
    pub text: String,
}

impl Operation for SaveActivityReply {
    type Data = SaveActivityReplyData;
    const NAME: &'static str = "SaveActivityReply";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation ($activityId: Int, $text: String) { \
        SaveActivityReply(activityId: $activityId, text: $text) { id } }";

    fn variables(&self) -> Value {
        json!({ "activityId": self.activity_id, "text": encode_astral(&self.text) })
    }
}

/// Most popular anime, one page at a time
#[derive(Debug, Clone, Copy)]
pub struct TopAnime {
    pub page: u32,
    pub per_page: u32,
}

impl Default for TopAnime {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
        }
    }
}

impl Operation for TopAnime {
    type Data = PageData;
    const NAME: &'static str = "TopAnime";
    const KIND: OperationKind = OperationKind::Query;
    const DOCUMENT: &'static str = "query ($page: Int, $perPage: Int) { \
        Page(page: $page, perPage: $perPage) { \
        media(type: ANIME, sort: POPULARITY_DESC) { \
        id title { romaji english native userPreferred } popularity episodes status \
        startDate { year month day } } } }";

    fn variables(&self) -> Value {
        json!({ "page": self.page, "perPage": self.per_page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_favourite_by_id_variables() {
        let anime = ToggleFavouriteById { anime: true, id: 21 };
        assert_eq!(anime.variables(), json!({ "animeId": 21 }));

        let manga = ToggleFavouriteById { anime: false, id: 30013 };
        assert_eq!(manga.variables(), json!({ "mangaId": 30013 }));
    }

    #[test]
    fn test_toggle_favourite_uses_kind_argument() {
        for (kind, argument) in [
            (FavType::Anime, "animeId"),
            (FavType::Manga, "mangaId"),
            (FavType::Character, "characterId"),
            (FavType::Staff, "staffId"),
            (FavType::Studio, "studioId"),
        ] {
            let variables = ToggleFavourite { kind, id: 7 }.variables();
            assert_eq!(variables, json!({ argument: 7 }));
            assert!(ToggleFavourite::DOCUMENT.contains(&format!("${}", argument)));
        }
    }

    #[test]
    fn test_list_edit_omits_absent_fields() {
        let edit = ListEntryEdit::new(1535);
        assert_eq!(edit.variables(), json!({ "mediaID": 1535 }));

        let edit = ListEntryEdit {
            progress: Some(12),
            status: Some(MediaListStatus::Current),
            ..ListEntryEdit::new(1535)
        };
        let variables = edit.variables();
        let object = variables.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["progress"], json!(12));
        assert_eq!(object["status"], json!("CURRENT"));
        assert!(!object.contains_key("notes"));
        assert!(!object.values().any(Value::is_null));
    }

    #[test]
    fn test_list_edit_full_variables() {
        let edit = ListEntryEdit {
            media_id: 1,
            progress: Some(3),
            score: Some(85),
            repeat: Some(1),
            notes: Some("first line\nsecond line".to_string()),
            status: Some(MediaListStatus::Repeating),
            private: Some(true),
            started_at: Some(FuzzyDate::new(Some(2024), Some(1), None)),
            completed_at: None,
            custom_lists: Some(vec!["Favourites".to_string()]),
        };

        assert_eq!(
            edit.variables(),
            json!({
                "mediaID": 1,
                "progress": 3,
                "scoreRaw": 85,
                "repeat": 1,
                "notes": "first line\nsecond line",
                "status": "REPEATING",
                "private": true,
                "start": { "year": 2024, "month": 1 },
                "customLists": ["Favourites"],
            })
        );
    }

    #[test]
    fn test_free_text_is_encoded() {
        let activity = SaveTextActivity {
            text: "watched 🎬 tonight".to_string(),
        };
        assert_eq!(activity.variables(), json!({ "text": "watched &#127916; tonight" }));

        let review = SaveReview {
            media_id: 5,
            summary: "😀".to_string(),
            body: "plain".to_string(),
            score: 90,
        };
        assert_eq!(review.variables()["summary"], json!("&#128512;"));
        assert_eq!(review.variables()["body"], json!("plain"));
    }

    #[test]
    fn test_operation_kinds() {
        assert_eq!(TopAnime::KIND, OperationKind::Query);
        assert_eq!(ListEntryEdit::KIND, OperationKind::Mutation);
        assert_eq!(RateReview::KIND, OperationKind::Mutation);
        assert_eq!(
            RateReview { review_id: 3, rating: ReviewRating::UpVote }.variables(),
            json!({ "reviewId": 3, "rating": "UP_VOTE" })
        );
    }
}
