use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Poster widths offered by the image CDN
pub mod poster_size {
    pub const SMALL: &str = "w185";
    pub const MEDIUM: &str = "w342";
    pub const LARGE: &str = "w500";
    pub const ORIGINAL: &str = "original";
}

/// Backdrop widths offered by the image CDN
pub mod backdrop_size {
    pub const SMALL: &str = "w300";
    pub const MEDIUM: &str = "w780";
    pub const LARGE: &str = "w1280";
    pub const ORIGINAL: &str = "original";
}

/// Build a full image URL from a TMDB path, `None` when the item has no image
pub fn image_url(base: &str, path: Option<&str>, size: &str) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", base.trim_end_matches('/'), size, p))
}

/// Type of media content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by TMDB and embed providers
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Translation key for the plural section label
    pub fn label_key(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Tv => "tvShows",
        }
    }

    /// Route segments other than "tv" are treated as movies
    pub fn from_route(segment: &str) -> Self {
        if segment == "tv" {
            MediaType::Tv
        } else {
            MediaType::Movie
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" | "movies" => Ok(MediaType::Movie),
            "tv" | "series" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type '{}' (expected movie or tv)", other)),
        }
    }
}

/// Scope of a search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchScope {
    #[default]
    Multi,
    Movie,
    Tv,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Multi => "multi",
            SearchScope::Movie => "movie",
            SearchScope::Tv => "tv",
        }
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi" | "all" => Ok(SearchScope::Multi),
            "movie" => Ok(SearchScope::Movie),
            "tv" => Ok(SearchScope::Tv),
            other => Err(format!("unknown search scope '{}' (expected multi, movie or tv)", other)),
        }
    }
}

/// Window for trending lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Sort orders offered by the browse filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortBy {
    #[default]
    Popularity,
    Rating,
    Newest,
    Oldest,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [SortBy::Popularity, SortBy::Rating, SortBy::Newest, SortBy::Oldest];

    /// `sort_by` query value; TV sorts by first air date instead of release date
    pub fn as_param(&self, media_type: MediaType) -> &'static str {
        match (self, media_type) {
            (SortBy::Popularity, _) => "popularity.desc",
            (SortBy::Rating, _) => "vote_average.desc",
            (SortBy::Newest, MediaType::Movie) => "release_date.desc",
            (SortBy::Oldest, MediaType::Movie) => "release_date.asc",
            (SortBy::Newest, MediaType::Tv) => "first_air_date.desc",
            (SortBy::Oldest, MediaType::Tv) => "first_air_date.asc",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            SortBy::Popularity => "sortPopular",
            SortBy::Rating => "sortRating",
            SortBy::Newest => "sortNewest",
            SortBy::Oldest => "sortOldest",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popularity" | "popularity.desc" => Ok(SortBy::Popularity),
            "rating" | "vote_average.desc" => Ok(SortBy::Rating),
            "newest" | "release_date.desc" => Ok(SortBy::Newest),
            "oldest" | "release_date.asc" => Ok(SortBy::Oldest),
            other => Err(format!(
                "unknown sort '{}' (expected popularity, rating, newest or oldest)",
                other
            )),
        }
    }
}

/// Filters for the discover endpoint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoverFilters {
    pub genre: Option<u32>,
    pub year: Option<i32>,
    pub sort_by: SortBy,
    pub min_rating: Option<f32>,
    pub original_language: Option<String>,
    pub page: u32,
}

/// TMDB genre id for animation
pub const ANIMATION_GENRE: u32 = 16;

impl DiscoverFilters {
    /// Japanese animation, most popular first
    pub fn anime(page: u32) -> Self {
        Self {
            genre: Some(ANIMATION_GENRE),
            original_language: Some("ja".to_string()),
            page,
            ..Self::default()
        }
    }

    pub fn page(&self) -> u32 {
        self.page.max(1)
    }
}

/// A movie, series or person as returned in list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// "movie", "tv" or "person" on trending and multi-search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl MediaItem {
    /// Minimal record, mostly useful for tests and demo data
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            name: None,
            original_title: None,
            original_name: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            first_air_date: None,
            vote_average: None,
            overview: None,
            genre_ids: Vec::new(),
            original_language: None,
            media_type: None,
        }
    }

    /// Title for movies, name for series
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date for movies, first air date for series
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    pub fn year(&self) -> Option<i32> {
        self.date()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.year())
    }

    /// Rating with one decimal, "N/A" when unrated
    pub fn rating_display(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }

    pub fn is_person(&self) -> bool {
        self.media_type.as_deref() == Some("person")
    }

    /// Explicit media type, else a guess from series-only fields
    pub fn inferred_media_type(&self) -> MediaType {
        match self.media_type.as_deref() {
            Some("tv") => MediaType::Tv,
            Some("movie") => MediaType::Movie,
            _ if self.first_air_date.is_some() || self.name.is_some() => MediaType::Tv,
            _ => MediaType::Movie,
        }
    }
}

/// One page of a paginated list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub iso_639_1: Option<String>,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }

    /// Autoplaying embed URL for a YouTube trailer
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}?autoplay=1", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Season entry in a series' details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: u64,
    pub episode_number: u32,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl Episode {
    pub fn new(episode_number: u32) -> Self {
        Self {
            id: u64::from(episode_number),
            episode_number,
            season_number: None,
            name: Some(format!("Episode {}", episode_number)),
            overview: None,
            air_date: None,
            still_path: None,
            vote_average: None,
            runtime: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Episode {}", self.episode_number))
    }
}

/// Episode listing of one season
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Full record of a movie or series, with appended credits, videos and related items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(flatten)]
    pub item: MediaItem,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub videos: VideoList,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub similar: Option<Page<MediaItem>>,
    #[serde(default)]
    pub recommendations: Option<Page<MediaItem>>,
}

impl MediaDetails {
    pub fn new(item: MediaItem) -> Self {
        Self {
            item,
            tagline: None,
            runtime: None,
            episode_run_time: Vec::new(),
            genres: Vec::new(),
            number_of_seasons: None,
            number_of_episodes: None,
            seasons: Vec::new(),
            videos: VideoList::default(),
            credits: Credits::default(),
            similar: None,
            recommendations: None,
        }
    }

    /// First YouTube trailer, if any
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.results.iter().find(|v| v.is_youtube_trailer())
    }

    /// Movie runtime, or the first listed episode runtime for series
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .filter(|r| *r > 0)
            .or_else(|| self.episode_run_time.first().copied())
    }

    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        let cast = &self.credits.cast;
        &cast[..cast.len().min(limit)]
    }

    /// Similar titles, falling back to recommendations when there are none
    pub fn related(&self, limit: usize) -> Vec<&MediaItem> {
        let similar = first_results(self.similar.as_ref(), limit);
        if similar.is_empty() {
            first_results(self.recommendations.as_ref(), limit)
        } else {
            similar
        }
    }

    pub fn has_season(&self, season_number: u32) -> bool {
        self.seasons.iter().any(|s| s.season_number == season_number)
    }

    /// Season 1 if present, else the first listed season
    pub fn default_season(&self) -> Option<u32> {
        if self.has_season(1) {
            Some(1)
        } else {
            self.seasons.first().map(|s| s.season_number)
        }
    }

    /// Seasons ordered by number, specials first
    pub fn sorted_seasons(&self) -> Vec<&SeasonSummary> {
        let mut seasons: Vec<_> = self.seasons.iter().collect();
        seasons.sort_by_key(|s| s.season_number);
        seasons
    }

    /// Append videos that are not already listed
    pub fn merge_videos(&mut self, videos: Vec<Video>) {
        for video in videos {
            if !self.videos.results.iter().any(|v| v.key == video.key) {
                self.videos.results.push(video);
            }
        }
    }
}

fn first_results(page: Option<&Page<MediaItem>>, limit: usize) -> Vec<&MediaItem> {
    page.map(|p| p.results.iter().take(limit).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(n: u32) -> SeasonSummary {
        SeasonSummary {
            id: Some(u64::from(n) + 100),
            season_number: n,
            name: None,
            episode_count: Some(10),
            air_date: None,
        }
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url(TMDB_IMAGE_BASE, Some("/abc.jpg"), poster_size::LARGE).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(image_url(TMDB_IMAGE_BASE, None, poster_size::SMALL), None);
        assert_eq!(image_url(TMDB_IMAGE_BASE, Some(""), backdrop_size::ORIGINAL), None);
    }

    #[test]
    fn test_media_type_from_route() {
        assert_eq!(MediaType::from_route("tv"), MediaType::Tv);
        assert_eq!(MediaType::from_route("movie"), MediaType::Movie);
        assert_eq!(MediaType::from_route("anything"), MediaType::Movie);
    }

    #[test]
    fn test_display_title_and_year() {
        let mut item = MediaItem::new(1, "Dune");
        item.release_date = Some("2021-10-22".to_string());
        assert_eq!(item.display_title(), "Dune");
        assert_eq!(item.year(), Some(2021));

        let series: MediaItem = serde_json::from_str(
            r#"{"id": 2, "name": "Dark", "first_air_date": "2017-12-01"}"#,
        )
        .unwrap();
        assert_eq!(series.display_title(), "Dark");
        assert_eq!(series.year(), Some(2017));
        assert_eq!(series.inferred_media_type(), MediaType::Tv);
    }

    #[test]
    fn test_rating_display() {
        let mut item = MediaItem::new(1, "X");
        assert_eq!(item.rating_display(), "N/A");
        item.vote_average = Some(7.25);
        assert_eq!(item.rating_display(), "7.2");
    }

    #[test]
    fn test_default_season_prefers_one() {
        let mut details = MediaDetails::new(MediaItem::new(1, "Show"));
        assert_eq!(details.default_season(), None);

        details.seasons = vec![season(0), season(1), season(2)];
        assert_eq!(details.default_season(), Some(1));

        details.seasons = vec![season(3), season(4)];
        assert_eq!(details.default_season(), Some(3));
    }

    #[test]
    fn test_trailer_and_merge() {
        let mut details = MediaDetails::new(MediaItem::new(1, "Show"));
        assert!(details.trailer().is_none());

        let teaser = Video {
            key: "t1".to_string(),
            site: "YouTube".to_string(),
            kind: "Teaser".to_string(),
            name: String::new(),
            iso_639_1: None,
        };
        let trailer = Video {
            key: "t2".to_string(),
            kind: "Trailer".to_string(),
            ..teaser.clone()
        };
        details.merge_videos(vec![teaser.clone(), trailer.clone(), trailer.clone()]);
        assert_eq!(details.videos.results.len(), 2);
        assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("t2"));
        assert_eq!(
            details.trailer().unwrap().embed_url(),
            "https://www.youtube.com/embed/t2?autoplay=1"
        );
    }

    #[test]
    fn test_details_deserialization() {
        let json = r#"{
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "episode_run_time": [60],
            "genres": [{"id": 18, "name": "Drama"}],
            "seasons": [{"season_number": 0}, {"season_number": 1, "episode_count": 10}],
            "videos": {"results": [{"key": "abc", "site": "YouTube", "type": "Trailer", "name": "T"}]},
            "credits": {"cast": [{"id": 1, "name": "Actor", "character": "Role"}]},
            "similar": {"page": 1, "results": [], "total_pages": 0, "total_results": 0},
            "recommendations": {"page": 1, "results": [{"id": 5, "name": "Other"}]}
        }"#;
        let details: MediaDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.item.id, 1399);
        assert_eq!(details.runtime_minutes(), Some(60));
        assert_eq!(details.default_season(), Some(1));
        assert!(details.trailer().is_some());
        assert_eq!(details.top_cast(12).len(), 1);
        assert_eq!(details.related(8).len(), 1);
        assert_eq!(details.related(8)[0].id, 5);
    }

    #[test]
    fn test_sort_params() {
        assert_eq!(SortBy::Newest.as_param(MediaType::Movie), "release_date.desc");
        assert_eq!(SortBy::Newest.as_param(MediaType::Tv), "first_air_date.desc");
        assert_eq!("rating".parse::<SortBy>(), Ok(SortBy::Rating));
    }
}
