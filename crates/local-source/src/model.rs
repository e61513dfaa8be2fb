//! Catalogue models shared by all anime sources.

use serde::{Deserialize, Serialize};

/// Publication status of an anime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimeStatus {
    #[default]
    Unknown,
    Ongoing,
    Completed,
    Licensed,
    PublishingFinished,
    Cancelled,
    OnHiatus,
}

/// Anime as seen by a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SAnime {
    /// Source-relative identifier
    pub url: String,
    pub title: String,
    pub artist: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Comma separated genres
    pub genre: Option<String>,
    pub status: AnimeStatus,
    pub thumbnail_url: Option<String>,
    /// Whether details have been fetched
    pub initialized: bool,
}

impl SAnime {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Episode of an anime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SEpisode {
    pub url: String,
    pub name: String,
    /// Upload time in epoch milliseconds
    pub date_upload: i64,
    /// -1 when unknown
    pub episode_number: f32,
    pub scanlator: Option<String>,
}

/// Playable stream of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    pub quality: String,
    pub video_url: Option<String>,
}

/// One page of browse or search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimesPage {
    pub animes: Vec<SAnime>,
    pub has_next_page: bool,
}

impl AnimesPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.animes.is_empty()
    }
}

/// Sort order offered by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    /// Title, ascending
    Popular,
    /// Last modified, newest first
    Latest,
}

/// A single search filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnimeFilter {
    OrderBy(OrderBy),
    Text { name: String, value: String },
}

/// Ordered set of filters passed to a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeFilterList(pub Vec<AnimeFilter>);

impl AnimeFilterList {
    pub fn new(filters: Vec<AnimeFilter>) -> Self {
        Self(filters)
    }

    pub fn order_by(order: OrderBy) -> Self {
        Self(vec![AnimeFilter::OrderBy(order)])
    }

    /// First sort filter in the list
    pub fn order(&self) -> Option<OrderBy> {
        self.0.iter().find_map(|f| match f {
            AnimeFilter::OrderBy(order) => Some(*order),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
