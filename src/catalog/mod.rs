pub mod browse;
pub mod favorites;
pub mod home;
pub mod pagination;
pub mod search;

pub use browse::{BrowseKind, BrowseView};
pub use favorites::{FavoritesTab, FavoritesView};
pub use home::{HomeRow, HomeView};
pub use pagination::page_window;
pub use search::SearchView;
