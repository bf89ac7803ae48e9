use std::str::FromStr;

use crate::api::MediaType;
use crate::store::{AppStore, FavoriteEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoritesTab {
    #[default]
    Movies,
    Tv,
}

impl FavoritesTab {
    pub const ALL: [FavoritesTab; 2] = [FavoritesTab::Movies, FavoritesTab::Tv];

    pub fn media_type(&self) -> MediaType {
        match self {
            FavoritesTab::Movies => MediaType::Movie,
            FavoritesTab::Tv => MediaType::Tv,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            FavoritesTab::Movies => "movies",
            FavoritesTab::Tv => "tvShows",
        }
    }
}

impl FromStr for FavoritesTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" | "movie" => Ok(FavoritesTab::Movies),
            "tv" => Ok(FavoritesTab::Tv),
            other => Err(format!("unknown tab '{}' (expected movies or tv)", other)),
        }
    }
}

/// Reads favorites from the store on every call, so it never goes stale
#[derive(Debug, Default)]
pub struct FavoritesView {
    tab: FavoritesTab,
}

impl FavoritesView {
    pub fn new(tab: FavoritesTab) -> Self {
        Self { tab }
    }

    pub fn tab(&self) -> FavoritesTab {
        self.tab
    }

    pub fn count(&self, store: &AppStore, tab: FavoritesTab) -> usize {
        store.favorites().list(tab.media_type()).len()
    }

    pub fn entries<'a>(&self, store: &'a AppStore) -> &'a [FavoriteEntry] {
        store.favorites().list(self.tab.media_type())
    }

    /// Tab label with its count, e.g. "Movies (3)"
    pub fn tab_label(&self, store: &AppStore, tab: FavoritesTab) -> String {
        format!("{} ({})", store.translate(tab.label_key()), self.count(store, tab))
    }
}
