use crate::api::{DiscoverFilters, MediaItem, MediaType, MetadataSource, Page, TimeWindow};
use crate::fetch::{FetchHook, FetchState};
use crate::i18n::Locale;

/// Items in the featured strip
const FEATURED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRow {
    Trending,
    PopularMovies,
    PopularTv,
    TopRated,
    Anime,
}

impl HomeRow {
    pub const ALL: [HomeRow; 5] = [
        HomeRow::Trending,
        HomeRow::PopularMovies,
        HomeRow::PopularTv,
        HomeRow::TopRated,
        HomeRow::Anime,
    ];

    pub fn title_key(&self) -> &'static str {
        match self {
            HomeRow::Trending => "trending",
            HomeRow::PopularMovies => "movies",
            HomeRow::PopularTv => "tvShows",
            HomeRow::TopRated => "topRated",
            HomeRow::Anime => "anime",
        }
    }

    /// Media type of the row's items; trending mixes both
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            HomeRow::Trending => None,
            HomeRow::PopularMovies | HomeRow::TopRated => Some(MediaType::Movie),
            HomeRow::PopularTv | HomeRow::Anime => Some(MediaType::Tv),
        }
    }
}

type Row = FetchHook<Locale, Page<MediaItem>>;

#[derive(Debug, Default)]
pub struct HomeView {
    trending: Row,
    popular_movies: Row,
    popular_tv: Row,
    top_rated: Row,
    anime: Row,
}

impl HomeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all rows concurrently
    pub async fn load(&mut self, source: &dyn MetadataSource, locale: Locale) {
        tokio::join!(
            self.trending.run(locale, |locale| async move {
                source.trending(None, TimeWindow::Week, locale, 1).await
            }),
            self.popular_movies.run(locale, |locale| async move {
                source.popular(MediaType::Movie, locale, 1).await
            }),
            self.popular_tv.run(locale, |locale| async move {
                source.popular(MediaType::Tv, locale, 1).await
            }),
            self.top_rated.run(locale, |locale| async move {
                source.top_rated(MediaType::Movie, locale, 1).await
            }),
            self.anime.run(locale, |locale| async move {
                source
                    .discover(MediaType::Tv, &DiscoverFilters::anime(1), locale)
                    .await
            }),
        );
    }

    fn row(&self, row: HomeRow) -> &Row {
        match row {
            HomeRow::Trending => &self.trending,
            HomeRow::PopularMovies => &self.popular_movies,
            HomeRow::PopularTv => &self.popular_tv,
            HomeRow::TopRated => &self.top_rated,
            HomeRow::Anime => &self.anime,
        }
    }

    pub fn state(&self, row: HomeRow) -> &FetchState<Page<MediaItem>> {
        self.row(row).state()
    }

    pub fn items(&self, row: HomeRow) -> &[MediaItem] {
        self.state(row)
            .ready()
            .map(|page| page.results.as_slice())
            .unwrap_or_default()
    }

    /// Leading trending items shown large at the top
    pub fn featured(&self) -> &[MediaItem] {
        let trending = self.items(HomeRow::Trending);
        &trending[..trending.len().min(FEATURED)]
    }
}
