use chrono::Datelike;

use crate::api::{DiscoverFilters, Genre, MediaItem, MediaType, MetadataSource, Page, SortBy};
use crate::catalog::pagination::{clamp_total, MAX_PAGES};
use crate::fetch::{FetchHook, FetchState};
use crate::i18n::Locale;

/// Years offered by the year filter
const YEAR_OPTIONS: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseKind {
    Movies,
    Tv,
    /// Japanese animated series
    Anime,
}

impl BrowseKind {
    pub fn media_type(&self) -> MediaType {
        match self {
            BrowseKind::Movies => MediaType::Movie,
            BrowseKind::Tv | BrowseKind::Anime => MediaType::Tv,
        }
    }

    /// Translation key of the listing title
    pub fn title_key(&self) -> &'static str {
        match self {
            BrowseKind::Movies => "movies",
            BrowseKind::Tv => "tvShows",
            BrowseKind::Anime => "anime",
        }
    }

    /// Anime has a fixed genre and language and no user filters
    pub fn has_filters(&self) -> bool {
        !matches!(self, BrowseKind::Anime)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseKey {
    pub media_type: MediaType,
    pub filters: DiscoverFilters,
    pub locale: Locale,
}

#[derive(Debug)]
pub struct BrowseView {
    kind: BrowseKind,
    filters: DiscoverFilters,
    items: FetchHook<BrowseKey, Page<MediaItem>>,
    genres: FetchHook<(MediaType, Locale), Vec<Genre>>,
}

impl BrowseView {
    pub fn new(kind: BrowseKind) -> Self {
        Self {
            kind,
            filters: Self::base_filters(kind),
            items: FetchHook::new(),
            genres: FetchHook::new(),
        }
    }

    fn base_filters(kind: BrowseKind) -> DiscoverFilters {
        match kind {
            BrowseKind::Anime => DiscoverFilters::anime(1),
            _ => DiscoverFilters {
                page: 1,
                ..DiscoverFilters::default()
            },
        }
    }

    pub fn kind(&self) -> BrowseKind {
        self.kind
    }

    pub fn filters(&self) -> &DiscoverFilters {
        &self.filters
    }

    pub fn set_genre(&mut self, genre: Option<u32>) {
        if self.kind.has_filters() {
            self.filters.genre = genre;
            self.filters.page = 1;
        }
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        if self.kind.has_filters() {
            self.filters.year = year;
            self.filters.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        if self.kind.has_filters() {
            self.filters.sort_by = sort_by;
            self.filters.page = 1;
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page.clamp(1, MAX_PAGES);
    }

    pub fn page(&self) -> u32 {
        self.filters.page()
    }

    pub fn clear_filters(&mut self) {
        self.filters = Self::base_filters(self.kind);
    }

    pub fn has_active_filters(&self) -> bool {
        self.kind.has_filters()
            && (self.filters.genre.is_some()
                || self.filters.year.is_some()
                || self.filters.sort_by != SortBy::Popularity)
    }

    /// Load the listing, plus the genre list for filterable kinds
    pub async fn load(&mut self, source: &dyn MetadataSource, locale: Locale) {
        let media_type = self.kind.media_type();

        if self.kind.has_filters() {
            self.genres
                .run((media_type, locale), |(media_type, locale)| async move {
                    source.genres(media_type, locale).await
                })
                .await;
        }

        let key = BrowseKey {
            media_type,
            filters: self.filters.clone(),
            locale,
        };
        self.items
            .run(key, |key| async move {
                let mut page = source
                    .discover(key.media_type, &key.filters, key.locale)
                    .await?;
                page.total_pages = clamp_total(page.total_pages);
                Ok::<_, crate::error::ApiError>(page)
            })
            .await;
    }

    pub fn state(&self) -> &FetchState<Page<MediaItem>> {
        self.items.state()
    }

    pub fn items(&self) -> &[MediaItem] {
        self.items
            .state()
            .ready()
            .map(|page| page.results.as_slice())
            .unwrap_or_default()
    }

    pub fn total_pages(&self) -> u32 {
        self.items.data().map_or(1, |page| page.total_pages.max(1))
    }

    /// Genres for the filter; empty if they could not be loaded
    pub fn genres(&self) -> &[Genre] {
        self.genres.data().map(Vec::as_slice).unwrap_or_default()
    }
}

/// The last fifty years, newest first
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_OPTIONS).map(|offset| current_year - offset).collect()
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
