//! Anime catalogue source traits and the on-device source.

pub mod error;
pub mod local;
pub mod model;
pub mod source;

pub use error::{Result, SourceError};
pub use local::{is_local_anime, is_local_source, LocalAnimeSource};
pub use model::{AnimeFilter, AnimeFilterList, AnimeStatus, AnimesPage, OrderBy, SAnime, SEpisode, Video};
pub use source::{AnimeCatalogueSource, AnimeSource, UnmeteredSource};
