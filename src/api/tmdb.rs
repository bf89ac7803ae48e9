use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::media::{
    DiscoverFilters, Genre, MediaDetails, MediaItem, MediaType, Page, SearchScope, SeasonDetails,
    TimeWindow, Video, VideoList,
};
use crate::api::source::MetadataSource;
use crate::config::TmdbConfig;
use crate::error::ApiError;
use crate::i18n::Locale;

/// Sub-resources appended to a details request
const DETAILS_APPEND: &str = "credits,videos,similar,recommendations";

/// Map TMDB genre IDs to English genre names
pub fn genre_name(id: u32) -> Option<&'static str> {
    match id {
        28 => Some("Action"),
        12 => Some("Adventure"),
        16 => Some("Animation"),
        35 => Some("Comedy"),
        80 => Some("Crime"),
        99 => Some("Documentary"),
        18 => Some("Drama"),
        10751 => Some("Family"),
        14 => Some("Fantasy"),
        36 => Some("History"),
        27 => Some("Horror"),
        10402 => Some("Music"),
        9648 => Some("Mystery"),
        10749 => Some("Romance"),
        878 => Some("Sci-Fi"),
        53 => Some("Thriller"),
        10752 => Some("War"),
        37 => Some("Western"),
        // TV-specific genres
        10759 => Some("Action & Adventure"),
        10762 => Some("Kids"),
        10765 => Some("Sci-Fi & Fantasy"),
        10768 => Some("War & Politics"),
        _ => None,
    }
}

/// TMDB API client
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check if the client is configured (has API key)
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != "your_api_key_here"
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in query {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// `url` with the API key masked, for logging
    fn redact(&self, url: &str) -> String {
        url.replace(urlencoding::encode(&self.api_key).as_ref(), "***")
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query);
        tracing::debug!("Fetching {}", self.redact(&url));

        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(path.to_string())),
            status => return Err(ApiError::Tmdb(format!("HTTP {}", status))),
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn locale_page(locale: Locale, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("language", locale.code().to_string()),
        ("page", page.max(1).to_string()),
    ]
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn trending(
        &self,
        media_type: Option<MediaType>,
        window: TimeWindow,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let scope = media_type.map(|m| m.as_str()).unwrap_or("all");
        let path = format!("/trending/{}/{}", scope, window.as_str());
        self.get(&path, &locale_page(locale, page)).await
    }

    async fn popular(
        &self,
        media_type: MediaType,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let path = format!("/{}/popular", media_type.as_str());
        self.get(&path, &locale_page(locale, page)).await
    }

    async fn top_rated(
        &self,
        media_type: MediaType,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let path = format!("/{}/top_rated", media_type.as_str());
        self.get(&path, &locale_page(locale, page)).await
    }

    async fn discover(
        &self,
        media_type: MediaType,
        filters: &DiscoverFilters,
        locale: Locale,
    ) -> Result<Page<MediaItem>, ApiError> {
        let mut query = locale_page(locale, filters.page());
        query.push(("sort_by", filters.sort_by.as_param(media_type).to_string()));

        if let Some(genre) = filters.genre {
            query.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = filters.year {
            let name = match media_type {
                MediaType::Movie => "primary_release_year",
                MediaType::Tv => "first_air_date_year",
            };
            query.push((name, year.to_string()));
        }
        if let Some(rating) = filters.min_rating {
            query.push(("vote_average.gte", rating.to_string()));
        }
        if let Some(language) = &filters.original_language {
            query.push(("with_original_language", language.clone()));
        }

        let path = format!("/discover/{}", media_type.as_str());
        self.get(&path, &query).await
    }

    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        locale: Locale,
        page: u32,
    ) -> Result<Page<MediaItem>, ApiError> {
        let mut params = locale_page(locale, page);
        params.push(("query", query.to_string()));
        params.push(("include_adult", "false".to_string()));

        let path = format!("/search/{}", scope.as_str());
        self.get(&path, &params).await
    }

    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        locale: Locale,
    ) -> Result<MediaDetails, ApiError> {
        let path = format!("/{}/{}", media_type.as_str(), id);
        let query = [
            ("language", locale.code().to_string()),
            ("append_to_response", DETAILS_APPEND.to_string()),
        ];
        self.get(&path, &query).await
    }

    async fn videos(
        &self,
        media_type: MediaType,
        id: u64,
        locale: Locale,
    ) -> Result<Vec<Video>, ApiError> {
        let path = format!("/{}/{}/videos", media_type.as_str(), id);
        let list: VideoList = self
            .get(&path, &[("language", locale.code().to_string())])
            .await?;
        Ok(list.results)
    }

    async fn season(
        &self,
        series_id: u64,
        season_number: u32,
        locale: Locale,
    ) -> Result<SeasonDetails, ApiError> {
        let path = format!("/tv/{}/season/{}", series_id, season_number);
        self.get(&path, &[("language", locale.code().to_string())])
            .await
    }

    async fn genres(&self, media_type: MediaType, locale: Locale) -> Result<Vec<Genre>, ApiError> {
        let path = format!("/genre/{}/list", media_type.as_str());
        let list: GenreListResponse = self
            .get(&path, &[("language", locale.code().to_string())])
            .await?;
        Ok(list.genres)
    }
}

// Response types for TMDB API

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: &str) -> TmdbClient {
        TmdbClient::new(&TmdbConfig {
            api_key: api_key.to_string(),
            ..TmdbConfig::default()
        })
    }

    #[test]
    fn test_is_configured() {
        assert!(client("abc123").is_configured());
        assert!(!client("").is_configured());
        assert!(!client("your_api_key_here").is_configured());
    }

    #[test]
    fn test_url_encodes_query() {
        let url = client("k").url(
            "/search/multi",
            &[("query", "breaking bad".to_string()), ("page", "2".to_string())],
        );
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/multi?api_key=k&query=breaking%20bad&page=2"
        );
    }

    #[test]
    fn test_url_encodes_api_key() {
        let client = client("a&b=c d");
        let url = client.url("/movie/550", &[]);
        assert_eq!(url, "https://api.themoviedb.org/3/movie/550?api_key=a%26b%3Dc%20d");
        assert_eq!(client.redact(&url), "https://api.themoviedb.org/3/movie/550?api_key=***");
    }

    #[test]
    fn test_locale_page_clamps_page() {
        let query = locale_page(Locale::ArSa, 0);
        assert_eq!(query[0], ("language", "ar-SA".to_string()));
        assert_eq!(query[1], ("page", "1".to_string()));
    }

    #[test]
    fn test_genre_name() {
        assert_eq!(genre_name(16), Some("Animation"));
        assert_eq!(genre_name(1), None);
    }
}
