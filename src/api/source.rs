use async_trait::async_trait;

use crate::api::media::{
    DiscoverFilters, Genre, MediaDetails, MediaItem, MediaType, Page, SearchScope, SeasonDetails,
    TimeWindow, Video,
};
use crate::error::ApiError;
use crate::i18n::Locale;

/// Source of catalog metadata.
///
/// Every operation takes the locale the text should come back in. Results are
/// provider-shaped records; callers only rely on the fields modelled in
/// [`crate::api::media`].
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Trending items; `None` covers movies and series together
    async fn trending(
        &self,
        media_type: Option<MediaType>,
        window: TimeWindow,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError>;

    async fn popular(
        &self,
        media_type: MediaType,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError>;

    async fn top_rated(
        &self,
        media_type: MediaType,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError>;

    async fn discover(
        &self,
        media_type: MediaType,
        filters: &DiscoverFilters,
        locale: Locale,
    ) -> Result<Page<MediaItem>, ApiError>;

    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError>;

    /// Details with credits, videos, similar and recommended items appended
    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        locale: Locale,
    ) -> Result<MediaDetails, ApiError>;

    async fn videos(
        &self,
        media_type: MediaType,
        id: u64,
        locale: Locale,
    ) -> Result<Vec<Video>, ApiError>;

    async fn season(
        &self,
        series_id: u64,
        season_number: u32,
        locale: Locale,
    ) -> Result<SeasonDetails, ApiError>;

    async fn genres(&self, media_type: MediaType, locale: Locale) -> Result<Vec<Genre>, ApiError>;
}
