use clap::{Parser, Subcommand, ValueEnum};

use crate::api::{MediaType, SearchScope, SortBy};
use crate::catalog::{BrowseKind, FavoritesTab};
use crate::i18n::Language;

/// sinema - A bilingual terminal catalog for movies and TV shows
#[derive(Parser)]
#[command(name = "sinema")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Switch the interface language (ar or en); the choice is remembered
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Keep language and favorites in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

/// Listings reachable through `browse`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseTarget {
    Movies,
    Tv,
}

impl From<BrowseTarget> for BrowseKind {
    fn from(target: BrowseTarget) -> Self {
        match target {
            BrowseTarget::Movies => BrowseKind::Movies,
            BrowseTarget::Tv => BrowseKind::Tv,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// First-time setup
    Init,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a config value (format: key=value)
        #[arg(long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Trending, popular, top rated and anime shelves
    Home,

    /// Browse movies or TV shows with filters
    #[command(alias = "b")]
    Browse {
        #[arg(value_enum)]
        target: BrowseTarget,

        /// TMDB genre id
        #[arg(long)]
        genre: Option<u32>,

        /// Release (or first air) year
        #[arg(long)]
        year: Option<i32>,

        /// popularity, rating, newest or oldest
        #[arg(long, default_value = "popularity")]
        sort: SortBy,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Japanese animated series
    Anime {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search for movies and TV shows
    #[command(alias = "s")]
    Search {
        /// Search query
        query: Option<String>,

        /// multi, movie or tv
        #[arg(long, default_value = "multi")]
        scope: SearchScope,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show a title's details and episodes
    #[command(alias = "d")]
    Details {
        /// movie or tv
        media_type: MediaType,

        /// TMDB id
        id: u64,

        /// Season to list (defaults to season 1)
        #[arg(long)]
        season: Option<u32>,

        /// Episode batch to list, starting at 1
        #[arg(long)]
        batch: Option<usize>,

        /// Explore interactively (seasons, batches, servers, favorites)
        #[arg(short, long)]
        interactive: bool,
    },

    /// Open a movie or episode in an embed player
    #[command(alias = "w")]
    Watch {
        /// movie or tv
        media_type: MediaType,

        /// TMDB id
        id: u64,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,

        /// Embed provider id, e.g. vidsrc-to or multiembed
        #[arg(long)]
        server: Option<String>,

        /// Open the trailer instead
        #[arg(long)]
        trailer: bool,

        /// Only print the URL
        #[arg(long)]
        print: bool,
    },

    /// List favorites
    #[command(alias = "favs")]
    Favorites {
        /// movies or tv
        #[arg(long, default_value = "movies")]
        tab: FavoritesTab,
    },

    /// Add a title to favorites, or remove it if already there
    #[command(alias = "fav")]
    Favorite {
        /// movie or tv
        media_type: MediaType,

        /// TMDB id
        id: u64,
    },

    /// Toggle the interface language, or set it
    Lang {
        /// ar or en
        language: Option<Language>,
    },
}
