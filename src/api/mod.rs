pub mod media;
mod mock;
mod source;
mod tmdb;

use std::sync::Arc;

pub use media::{
    DiscoverFilters, Episode, Genre, MediaDetails, MediaItem, MediaType, Page, SearchScope,
    SeasonDetails, SeasonSummary, SortBy, TimeWindow, Video,
};
pub use mock::MockSource;
pub use source::MetadataSource;
pub use tmdb::TmdbClient;

use crate::config::Config;

/// Pick the metadata source for a config: TMDB when a key is set, demo data otherwise
pub fn source_from_config(config: &Config) -> Arc<dyn MetadataSource> {
    let client = TmdbClient::new(&config.tmdb);
    if client.is_configured() {
        Arc::new(client)
    } else {
        tracing::warn!("No TMDB API key configured, using the offline demo catalog");
        tracing::warn!("Run 'sinema config --set tmdb_api_key=<key>' to use real data");
        Arc::new(MockSource::new())
    }
}
