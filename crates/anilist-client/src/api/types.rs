//! AniList GraphQL request and response types.
//!
//! Response structs mirror the selection sets in [`crate::operations`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// GraphQL response envelope
///
/// `errors` is kept as raw JSON so callers can surface it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Value>,
}

impl<T> GraphQlResponse<T> {
    pub fn is_success(&self) -> bool {
        self.errors.is_none()
    }
}

/// Entity kinds that can be favourited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum FavType {
    Anime,
    Manga,
    Character,
    Staff,
    Studio,
}

impl FavType {
    /// Argument name of `ToggleFavourite` for this kind
    pub fn argument(&self) -> &'static str {
        match self {
            FavType::Anime => "animeId",
            FavType::Manga => "mangaId",
            FavType::Character => "characterId",
            FavType::Staff => "staffId",
            FavType::Studio => "studioId",
        }
    }
}

/// Calendar date with possibly unknown parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl FuzzyDate {
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Self {
        Self { year, month, day }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Complete calendar date, if all parts are known and valid
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

impl From<NaiveDate> for FuzzyDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

impl std::fmt::Display for FuzzyDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", y, m, d),
            (Some(y), Some(m), None) => write!(f, "{:04}-{:02}", y, m),
            (Some(y), None, _) => write!(f, "{:04}", y),
            _ => write!(f, "??"),
        }
    }
}

/// User list status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaListStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
}

/// Vote cast on a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewRating {
    NoVote,
    UpVote,
    DownVote,
}

impl ReviewRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewRating::NoVote => "NO_VOTE",
            ReviewRating::UpVote => "UP_VOTE",
            ReviewRating::DownVote => "DOWN_VOTE",
        }
    }
}

/// `SaveMediaListEntry` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMediaListEntryData {
    #[serde(rename = "SaveMediaListEntry")]
    pub entry: Option<SavedListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListEntry {
    pub score: Option<f64>,
    pub started_at: Option<FuzzyDate>,
    pub completed_at: Option<FuzzyDate>,
}

/// `DeleteMediaListEntry` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMediaListEntryData {
    #[serde(rename = "DeleteMediaListEntry")]
    pub result: Option<Deleted>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: Option<bool>,
}

/// `RateReview` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateReviewData {
    #[serde(rename = "RateReview")]
    pub review: Option<Review>,
}

/// Review returned after rating it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub media_id: i64,
    pub media_type: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i64>,
    pub rating_amount: Option<i64>,
    pub user_rating: Option<ReviewRating>,
    pub score: Option<i64>,
    pub private: Option<bool>,
    pub site_url: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub user: Option<ReviewUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUser {
    pub id: i64,
    pub name: String,
    pub banner_image: Option<String>,
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub medium: Option<String>,
    pub large: Option<String>,
}

/// `SaveReview` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReviewData {
    #[serde(rename = "SaveReview")]
    pub review: Option<SiteUrl>,
}

/// `SaveTextActivity` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTextActivityData {
    #[serde(rename = "SaveTextActivity")]
    pub activity: Option<SiteUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteUrl {
    pub site_url: Option<String>,
}

/// `SaveActivityReply` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveActivityReplyData {
    #[serde(rename = "SaveActivityReply")]
    pub reply: Option<ActivityReply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityReply {
    pub id: i64,
}

/// `Page` payload of the top anime read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub media: Vec<PageMedia>,
}

/// Media entry of a page
///
/// Jikan-shaped entries carry a plain title and `start_date` string
/// instead of the AniList title object and `startDate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMedia {
    pub id: i64,
    #[serde(default)]
    pub title: Option<MediaTitle>,
    pub popularity: Option<i64>,
    pub episodes: Option<i64>,
    pub status: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(rename = "start_date", default)]
    pub aired_from: Option<String>,
}

impl PageMedia {
    pub fn display_title(&self) -> &str {
        self.title.as_ref().map(MediaTitle::display).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaTitle {
    Plain(String),
    Localized {
        romaji: Option<String>,
        english: Option<String>,
        native: Option<String>,
        #[serde(rename = "userPreferred")]
        user_preferred: Option<String>,
    },
}

impl MediaTitle {
    /// Best available display title
    pub fn display(&self) -> &str {
        match self {
            MediaTitle::Plain(title) => title,
            MediaTitle::Localized {
                romaji,
                english,
                native,
                user_preferred,
            } => user_preferred
                .as_deref()
                .or(english.as_deref())
                .or(romaji.as_deref())
                .or(native.as_deref())
                .unwrap_or(""),
        }
    }
}
