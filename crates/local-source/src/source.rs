//! Capabilities every anime source provides.

use crate::error::Result;
use crate::model::{AnimeFilterList, AnimesPage, SAnime, SEpisode, Video};
use async_trait::async_trait;

/// A source of anime details, episodes and videos
#[async_trait]
pub trait AnimeSource: Send + Sync {
    /// Unique id of the source
    fn id(&self) -> i64;

    fn name(&self) -> &str;

    /// ISO 639-1 code, or `other`
    fn lang(&self) -> &str;

    async fn get_anime_details(&self, anime: SAnime) -> Result<SAnime>;

    async fn get_episode_list(&self, anime: &SAnime) -> Result<Vec<SEpisode>>;

    async fn get_video_list(&self, episode: &SEpisode) -> Result<Vec<Video>>;
}

/// A source that can be browsed and searched
#[async_trait]
pub trait AnimeCatalogueSource: AnimeSource {
    fn supports_latest(&self) -> bool;

    async fn fetch_popular_anime(&self, page: u32) -> Result<AnimesPage>;

    async fn fetch_latest_updates(&self, page: u32) -> Result<AnimesPage>;

    async fn fetch_search_anime(
        &self,
        page: u32,
        query: &str,
        filters: &AnimeFilterList,
    ) -> Result<AnimesPage>;

    fn get_filter_list(&self) -> AnimeFilterList;
}

/// Marker for sources whose requests are not metered
pub trait UnmeteredSource {}
