//! Catalogue source for anime stored on the device.
//!
//! Browsing is not implemented yet; every listing is a single empty page.

use crate::error::{Result, SourceError};
use crate::model::{AnimeFilterList, AnimesPage, OrderBy, SAnime, SEpisode, Video};
use crate::source::{AnimeCatalogueSource, AnimeSource, UnmeteredSource};
use async_trait::async_trait;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnimeSource;

impl LocalAnimeSource {
    pub const ID: i64 = 0;
    pub const NAME: &'static str = "Local anime source";
    pub const LANG: &'static str = "other";
    pub const HELP_URL: &'static str = "https://aniyomi.org/help/guides/local-anime/";

    pub fn new() -> Self {
        Self
    }

    fn popular_filters() -> AnimeFilterList {
        AnimeFilterList::order_by(OrderBy::Popular)
    }

    fn latest_filters() -> AnimeFilterList {
        AnimeFilterList::order_by(OrderBy::Latest)
    }
}

impl fmt::Display for LocalAnimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

#[async_trait]
impl AnimeSource for LocalAnimeSource {
    fn id(&self) -> i64 {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn lang(&self) -> &str {
        Self::LANG
    }

    async fn get_anime_details(&self, anime: SAnime) -> Result<SAnime> {
        debug!(url = %anime.url, "Local anime details requested");
        Ok(anime)
    }

    async fn get_episode_list(&self, anime: &SAnime) -> Result<Vec<SEpisode>> {
        debug!(url = %anime.url, "Local episode list requested");
        Ok(Vec::new())
    }

    async fn get_video_list(&self, _episode: &SEpisode) -> Result<Vec<Video>> {
        Err(SourceError::Unsupported("Unused".to_string()))
    }
}

#[async_trait]
impl AnimeCatalogueSource for LocalAnimeSource {
    fn supports_latest(&self) -> bool {
        true
    }

    async fn fetch_popular_anime(&self, page: u32) -> Result<AnimesPage> {
        self.fetch_search_anime(page, "", &Self::popular_filters())
            .await
    }

    async fn fetch_latest_updates(&self, page: u32) -> Result<AnimesPage> {
        self.fetch_search_anime(page, "", &Self::latest_filters())
            .await
    }

    async fn fetch_search_anime(
        &self,
        page: u32,
        query: &str,
        filters: &AnimeFilterList,
    ) -> Result<AnimesPage> {
        debug!(
            page,
            query,
            order = ?filters.order(),
            "Searching local anime"
        );
        Ok(AnimesPage::empty())
    }

    fn get_filter_list(&self) -> AnimeFilterList {
        Self::popular_filters()
    }
}

impl UnmeteredSource for LocalAnimeSource {}

/// Whether `source` is the local source
pub fn is_local_source(source: &dyn AnimeSource) -> bool {
    source.id() == LocalAnimeSource::ID
}

/// Whether an anime with this source id lives on the device
pub fn is_local_anime(source_id: i64) -> bool {
    source_id == LocalAnimeSource::ID
}
