use async_trait::async_trait;

use crate::api::media::{
    DiscoverFilters, Genre, MediaDetails, MediaItem, MediaType, Page, SearchScope, SeasonDetails,
    SeasonSummary, TimeWindow, Video,
};
use crate::api::source::MetadataSource;
use crate::api::tmdb::genre_name;
use crate::error::ApiError;
use crate::i18n::Locale;

/// Episodes generated for every demo season
const DEMO_EPISODES: u32 = 50;

const MOVIE_GENRES: &[u32] = &[28, 12, 16, 35, 80, 18, 14, 27, 878, 53];
const TV_GENRES: &[u32] = &[10759, 16, 35, 80, 18, 10765, 9648];

/// Offline metadata source with a fixed set of titles
#[derive(Debug, Default)]
pub struct MockSource;

impl MockSource {
    pub fn new() -> Self {
        Self
    }

    fn movies() -> Vec<MediaItem> {
        [
            (550, "Fight Club", "1999-10-15", 8.4, vec![18]),
            (27205, "Inception", "2010-07-15", 8.4, vec![28, 878]),
            (129, "Spirited Away", "2001-07-20", 8.5, vec![16, 14]),
            (496243, "Parasite", "2019-05-30", 8.5, vec![35, 53, 18]),
        ]
        .into_iter()
        .map(|(id, title, date, rating, genres)| {
            let mut item = MediaItem::new(id, title);
            item.release_date = Some(date.to_string());
            item.vote_average = Some(rating);
            item.genre_ids = genres;
            item.overview = Some(format!("{} is part of the offline demo catalog.", title));
            item.media_type = Some("movie".to_string());
            item
        })
        .collect()
    }

    fn series() -> Vec<MediaItem> {
        [
            (1396, "Breaking Bad", "2008-01-20", 8.9, vec![18, 80]),
            (70523, "Dark", "2017-12-01", 8.4, vec![80, 18, 10765]),
            (37854, "One Piece", "1999-10-20", 8.7, vec![10759, 16, 35]),
        ]
        .into_iter()
        .map(|(id, name, date, rating, genres)| {
            let mut item = MediaItem::new(id, name);
            item.title = None;
            item.name = Some(name.to_string());
            item.first_air_date = Some(date.to_string());
            item.vote_average = Some(rating);
            item.genre_ids = genres;
            item.overview = Some(format!("{} is part of the offline demo catalog.", name));
            item.media_type = Some("tv".to_string());
            item
        })
        .collect()
    }

    fn list(media_type: MediaType) -> Vec<MediaItem> {
        match media_type {
            MediaType::Movie => Self::movies(),
            MediaType::Tv => Self::series(),
        }
    }

    fn page(results: Vec<MediaItem>) -> Page<MediaItem> {
        let total_results = results.len() as u32;
        Page {
            page: 1,
            results,
            total_pages: 1,
            total_results,
        }
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn trending(
        &self,
        media_type: Option<MediaType>,
        _window: TimeWindow,
        _locale: Locale,
        _page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let results = match media_type {
            Some(media_type) => Self::list(media_type),
            None => Self::movies().into_iter().chain(Self::series()).collect(),
        };
        Ok(Self::page(results))
    }

    async fn popular(
        &self,
        media_type: MediaType,
        _locale: Locale,
        _page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        Ok(Self::page(Self::list(media_type)))
    }

    async fn top_rated(
        &self,
        media_type: MediaType,
        _locale: Locale,
        _page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let mut results = Self::list(media_type);
        results.sort_by(|a, b| {
            b.vote_average
                .partial_cmp(&a.vote_average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(Self::page(results))
    }

    async fn discover(
        &self,
        media_type: MediaType,
        filters: &DiscoverFilters,
        _locale: Locale,
    ) -> Result<Page<MediaItem>, ApiError> {
        let results = Self::list(media_type)
            .into_iter()
            .filter(|item| filters.year.map_or(true, |y| item.year() == Some(y)))
            .filter(|item| filters.genre.map_or(true, |g| item.genre_ids.contains(&g)))
            .filter(|item| {
                filters
                    .min_rating
                    .map_or(true, |r| item.vote_average.unwrap_or(0.0) >= r)
            })
            .collect();
        let mut page = Self::page(results);
        page.page = filters.page();
        Ok(page)
    }

    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        _locale: Locale,
        _page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let needle = query.to_lowercase();
        let candidates = match scope {
            SearchScope::Multi => Self::movies().into_iter().chain(Self::series()).collect(),
            SearchScope::Movie => Self::movies(),
            SearchScope::Tv => Self::series(),
        };
        let results = candidates
            .into_iter()
            .filter(|item| {
                item.display_title().to_lowercase().contains(&needle)
                    || item
                        .overview
                        .as_deref()
                        .is_some_and(|o| o.to_lowercase().contains(&needle))
            })
            .collect();
        Ok(Self::page(results))
    }

    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        _locale: Locale,
    ) -> Result<MediaDetails, ApiError> {
        let item = Self::list(media_type)
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("{}/{}", media_type, id)))?;

        let mut details = MediaDetails::new(item);
        details.tagline = Some("Demo data".to_string());
        details.genres = details
            .item
            .genre_ids
            .iter()
            .filter_map(|&id| genre_name(id).map(|name| Genre { id, name: name.to_string() }))
            .collect();

        match media_type {
            MediaType::Movie => details.runtime = Some(120),
            MediaType::Tv => {
                details.episode_run_time = vec![45];
                details.seasons = (1..=2)
                    .map(|n| SeasonSummary {
                        id: Some(id * 100 + u64::from(n)),
                        season_number: n,
                        name: None,
                        episode_count: Some(DEMO_EPISODES),
                        air_date: None,
                    })
                    .collect();
                details.number_of_seasons = Some(2);
                details.number_of_episodes = Some(DEMO_EPISODES * 2);
            }
        }

        Ok(details)
    }

    async fn videos(
        &self,
        _media_type: MediaType,
        _id: u64,
        _locale: Locale,
    ) -> Result<Vec<Video>, ApiError> {
        Ok(Vec::new())
    }

    async fn season(
        &self,
        _series_id: u64,
        season_number: u32,
        _locale: Locale,
    ) -> Result<SeasonDetails, ApiError> {
        let episodes = (1..=DEMO_EPISODES)
            .map(|n| {
                let mut episode = crate::api::media::Episode::new(n);
                episode.season_number = Some(season_number);
                episode.air_date = Some("2023-01-01".to_string());
                episode.vote_average = Some(8.5);
                episode.runtime = Some(24);
                episode
            })
            .collect();

        Ok(SeasonDetails {
            season_number: Some(season_number),
            name: None,
            episodes,
        })
    }

    async fn genres(&self, media_type: MediaType, _locale: Locale) -> Result<Vec<Genre>, ApiError> {
        let ids = match media_type {
            MediaType::Movie => MOVIE_GENRES,
            MediaType::Tv => TV_GENRES,
        };
        Ok(ids
            .iter()
            .filter_map(|&id| genre_name(id).map(|name| Genre { id, name: name.to_string() }))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_matches_title_case_insensitively() {
        let source = MockSource::new();
        let page = source
            .search("DARK", SearchScope::Multi, Locale::EnUs, 1)
            .await
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].display_title(), "Dark");

        let movies_only = source
            .search("dark", SearchScope::Movie, Locale::EnUs, 1)
            .await
            .unwrap();
        assert!(movies_only.results.is_empty());
    }

    #[tokio::test]
    async fn test_details_for_series_has_seasons() {
        let source = MockSource::new();
        let details = source.details(MediaType::Tv, 1396, Locale::ArSa).await.unwrap();
        assert_eq!(details.default_season(), Some(1));
        assert_eq!(details.seasons.len(), 2);

        let missing = source.details(MediaType::Movie, 1396, Locale::ArSa).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_season_has_demo_episodes() {
        let season = MockSource::new().season(1396, 2, Locale::EnUs).await.unwrap();
        assert_eq!(season.episodes.len(), DEMO_EPISODES as usize);
        assert_eq!(season.episodes[0].season_number, Some(2));
    }

    #[tokio::test]
    async fn test_discover_filters_by_year() {
        let filters = DiscoverFilters {
            year: Some(2010),
            ..DiscoverFilters::default()
        };
        let page = MockSource::new()
            .discover(MediaType::Movie, &filters, Locale::EnUs)
            .await
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 27205);
    }
}
