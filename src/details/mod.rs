//! State machine behind the media details view.
//!
//! [`DetailsView`] owns two fetch hooks (the title's details and the episode
//! list of the selected season) plus the view's own selections: season,
//! display batch, embed provider, and the open/closed state of the episode
//! browser, player and trailer. It performs no I/O. Transitions return the
//! [`Effect`]s to run, and their outcomes come back through
//! [`DetailsView::apply`]. [`driver::DetailsDriver`] runs effects against a
//! [`crate::api::MetadataSource`].

pub mod driver;
pub mod episodes;
pub mod providers;

use crate::api::{Episode, MediaDetails, MediaType, SeasonDetails, Video};
use crate::error::{ApiError, DetailsError};
use crate::fetch::{FetchHook, FetchRequest};
use crate::i18n::{Locale, FALLBACK_LOCALE};
use crate::store::AppStore;

use providers::EmbedProvider;

/// The `(media type, id)` pair a details view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub media_type: MediaType,
    pub id: u64,
}

impl Route {
    pub fn new(media_type: MediaType, id: u64) -> Self {
        Self { media_type, id }
    }

    /// Parse the `/:type/:id` path segments. Any type other than `tv` is a movie.
    pub fn parse(type_segment: &str, id: &str) -> Option<Self> {
        let id = id.trim().parse().ok()?;
        Some(Self::new(MediaType::from_route(type_segment), id))
    }
}

/// A specific episode of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsKey {
    pub route: Route,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonKey {
    pub series_id: u64,
    pub season: u32,
    pub locale: Locale,
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchDetails(FetchRequest<DetailsKey>),
    /// Videos in `locale`, merged into the details loaded by `request`
    FetchFallbackVideos {
        request: FetchRequest<DetailsKey>,
        locale: Locale,
    },
    FetchEpisodes(FetchRequest<SeasonKey>),
}

/// Outcome of an [`Effect`]
#[derive(Debug)]
pub enum DetailsMsg {
    DetailsLoaded(FetchRequest<DetailsKey>, Result<MediaDetails, ApiError>),
    FallbackVideosLoaded(FetchRequest<DetailsKey>, Result<Vec<Video>, ApiError>),
    EpisodesLoaded(FetchRequest<SeasonKey>, Result<SeasonDetails, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailsPhase<'a> {
    /// Not mounted
    Idle,
    Loading,
    Ready(&'a MediaDetails),
    Failed(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpisodesPhase<'a> {
    /// Movies, or a series without seasons
    Idle,
    Loading { season: u32 },
    Ready { season: u32, episodes: &'a [Episode] },
    /// The season has no episodes or could not be loaded
    Empty { season: u32 },
}

/// What "watch now" ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchNow {
    Playing,
    /// No episode list yet, so the episode browser was opened instead
    BrowsingEpisodes,
}

#[derive(Debug, Clone, Default)]
struct PlayerState {
    open: bool,
    episode: Option<EpisodeRef>,
}

#[derive(Debug)]
pub struct DetailsView {
    providers: Vec<EmbedProvider>,
    active_provider: usize,
    locale: Locale,
    route: Option<Route>,
    details: FetchHook<DetailsKey, MediaDetails>,
    episodes: FetchHook<SeasonKey, SeasonDetails>,
    season: Option<u32>,
    batch: usize,
    episodes_open: bool,
    player: PlayerState,
    trailer_open: bool,
}

impl DetailsView {
    /// An unmounted view. An empty provider list falls back to the built-in servers.
    pub fn new(providers: Vec<EmbedProvider>) -> Self {
        let providers = if providers.is_empty() {
            providers::builtin_providers()
        } else {
            providers
        };

        Self {
            providers,
            active_provider: 0,
            locale: FALLBACK_LOCALE,
            route: None,
            details: FetchHook::new(),
            episodes: FetchHook::new(),
            season: None,
            batch: 0,
            episodes_open: false,
            player: PlayerState::default(),
            trailer_open: false,
        }
    }

    pub fn mount(&mut self, route: Route, locale: Locale) -> Vec<Effect> {
        self.locale = locale;
        self.navigate(route)
    }

    /// Show another title, resetting every per-title selection
    pub fn navigate(&mut self, route: Route) -> Vec<Effect> {
        if self.route == Some(route) {
            return Vec::new();
        }
        tracing::debug!("Details view showing {} {}", route.media_type, route.id);

        self.route = Some(route);
        self.season = None;
        self.batch = 0;
        self.episodes_open = false;
        self.player = PlayerState::default();
        self.trailer_open = false;
        self.episodes.reset();
        self.details.reset();

        self.details
            .update(DetailsKey {
                route,
                locale: self.locale,
            })
            .map(Effect::FetchDetails)
            .into_iter()
            .collect()
    }

    /// Reload everything locale-dependent, keeping the current selections
    pub fn set_locale(&mut self, locale: Locale) -> Vec<Effect> {
        if self.locale == locale {
            return Vec::new();
        }
        self.locale = locale;

        let Some(route) = self.route else {
            return Vec::new();
        };
        let mut effects: Vec<Effect> = self
            .details
            .update(DetailsKey { route, locale })
            .map(Effect::FetchDetails)
            .into_iter()
            .collect();
        if let Some(season) = self.season {
            effects.extend(self.request_episodes(route.id, season));
        }
        effects
    }

    /// Retry the details fetch, e.g. after a failure
    pub fn retry(&mut self) -> Vec<Effect> {
        self.details
            .refetch()
            .map(Effect::FetchDetails)
            .into_iter()
            .collect()
    }

    /// Stop for good. Results still in flight are dropped.
    pub fn unmount(&mut self) {
        if let Some(route) = self.route {
            tracing::debug!("Unmounting details view for {} {}", route.media_type, route.id);
        }
        self.details.teardown();
        self.episodes.teardown();
        self.player = PlayerState::default();
        self.trailer_open = false;
        self.episodes_open = false;
    }

    pub fn apply(&mut self, msg: DetailsMsg) -> Vec<Effect> {
        match msg {
            DetailsMsg::DetailsLoaded(request, result) => self.on_details(request, result),
            DetailsMsg::FallbackVideosLoaded(request, result) => {
                self.on_fallback_videos(&request, result);
                Vec::new()
            }
            DetailsMsg::EpisodesLoaded(request, result) => {
                if let Err(e) = &result {
                    tracing::warn!("Failed to load season {}: {}", request.key().season, e);
                }
                if self.episodes.resolve(&request, result) {
                    self.batch = 0;
                }
                Vec::new()
            }
        }
    }

    fn on_details(
        &mut self,
        request: FetchRequest<DetailsKey>,
        result: Result<MediaDetails, ApiError>,
    ) -> Vec<Effect> {
        let failed = result.is_err();
        if let Err(e) = &result {
            tracing::warn!("Failed to load details: {}", e);
        }
        if !self.details.resolve(&request, result) || failed {
            return Vec::new();
        }
        let Some(details) = self.details.data() else {
            return Vec::new();
        };

        let key = request.key();
        let needs_fallback = details.trailer().is_none() && key.locale != FALLBACK_LOCALE;
        let target_season = match key.route.media_type {
            MediaType::Tv => self
                .season
                .filter(|s| details.has_season(*s))
                .or_else(|| details.default_season()),
            MediaType::Movie => None,
        };
        let series_id = key.route.id;

        let mut effects = Vec::new();
        if needs_fallback {
            tracing::debug!("No trailer in {}, falling back to {}", key.locale, FALLBACK_LOCALE);
            effects.push(Effect::FetchFallbackVideos {
                request: request.clone(),
                locale: FALLBACK_LOCALE,
            });
        }

        if target_season != self.season {
            effects.extend(self.change_season(target_season));
        } else if let Some(season) = target_season {
            // Same season: only refetches if the locale moved on
            effects.extend(self.request_episodes(series_id, season));
        }
        effects
    }

    fn on_fallback_videos(
        &mut self,
        request: &FetchRequest<DetailsKey>,
        result: Result<Vec<Video>, ApiError>,
    ) {
        if !self.details.is_current(request) {
            tracing::debug!("Dropping fallback videos for superseded details");
            return;
        }
        match result {
            Ok(videos) => {
                if let Some(details) = self.details.data_mut() {
                    details.merge_videos(videos);
                }
            }
            Err(e) => tracing::warn!("Fallback trailer fetch failed: {}", e),
        }
    }

    fn change_season(&mut self, season: Option<u32>) -> Vec<Effect> {
        self.season = season;
        self.batch = 0;
        match (self.route, season) {
            (Some(route), Some(season)) if route.media_type == MediaType::Tv => {
                self.request_episodes(route.id, season).into_iter().collect()
            }
            _ => {
                self.episodes.reset();
                Vec::new()
            }
        }
    }

    fn request_episodes(&mut self, series_id: u64, season: u32) -> Option<Effect> {
        let request = self.episodes.update(SeasonKey {
            series_id,
            season,
            locale: self.locale,
        })?;
        // The list is empty until the new fetch lands
        self.batch = 0;
        Some(Effect::FetchEpisodes(request))
    }

    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn details_phase(&self) -> DetailsPhase<'_> {
        if self.route.is_none() {
            return DetailsPhase::Idle;
        }
        let state = self.details.state();
        if state.loading {
            DetailsPhase::Loading
        } else if let Some(error) = &state.error {
            DetailsPhase::Failed(error)
        } else if let Some(details) = &state.data {
            DetailsPhase::Ready(details)
        } else {
            DetailsPhase::Loading
        }
    }

    /// Loaded details, if current
    pub fn details(&self) -> Option<&MediaDetails> {
        self.details.state().ready()
    }

    pub fn season(&self) -> Option<u32> {
        self.season
    }

    pub fn select_season(&mut self, season: u32) -> Result<Vec<Effect>, DetailsError> {
        let route = self.route.ok_or(DetailsError::NotReady)?;
        if route.media_type != MediaType::Tv {
            return Err(DetailsError::WrongMediaType("series"));
        }
        let details = self.details().ok_or(DetailsError::NotReady)?;
        if !details.has_season(season) {
            return Err(DetailsError::UnknownSeason(season));
        }
        if self.season == Some(season) {
            return Ok(Vec::new());
        }
        Ok(self.change_season(Some(season)))
    }

    /// Episode list of the selected season. Never shows another season's list.
    pub fn episodes_phase(&self) -> EpisodesPhase<'_> {
        let Some(season) = self.season else {
            return EpisodesPhase::Idle;
        };

        let state = self.episodes.state();
        let is_selected = self.episodes.key().is_some_and(|key| key.season == season);
        if !is_selected || state.loading {
            return EpisodesPhase::Loading { season };
        }
        if state.error.is_some() {
            return EpisodesPhase::Empty { season };
        }
        match &state.data {
            Some(data) if !data.episodes.is_empty() => EpisodesPhase::Ready {
                season,
                episodes: &data.episodes,
            },
            Some(_) => EpisodesPhase::Empty { season },
            None => EpisodesPhase::Loading { season },
        }
    }

    pub fn episodes(&self) -> &[Episode] {
        match self.episodes_phase() {
            EpisodesPhase::Ready { episodes, .. } => episodes,
            _ => &[],
        }
    }

    pub fn is_episodes_open(&self) -> bool {
        self.episodes_open
    }

    pub fn open_episodes(&mut self) -> Result<(), DetailsError> {
        match self.route {
            Some(route) if route.media_type == MediaType::Tv => {
                self.episodes_open = true;
                Ok(())
            }
            Some(_) => Err(DetailsError::WrongMediaType("series")),
            None => Err(DetailsError::NotReady),
        }
    }

    /// Hide the browser. The loaded list stays cached.
    pub fn close_episodes(&mut self) {
        self.episodes_open = false;
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn batch_count(&self) -> usize {
        episodes::batch_count(self.episodes().len())
    }

    /// Batch 0 is always selectable, even before any episodes arrived
    pub fn select_batch(&mut self, index: usize) -> Result<(), DetailsError> {
        let count = self.batch_count();
        if index != 0 && index >= count {
            return Err(DetailsError::BatchOutOfRange { index, count });
        }
        self.batch = index;
        Ok(())
    }

    pub fn next_batch(&mut self) -> bool {
        self.select_batch(self.batch + 1).is_ok()
    }

    pub fn previous_batch(&mut self) -> bool {
        match self.batch.checked_sub(1) {
            Some(index) => self.select_batch(index).is_ok(),
            None => false,
        }
    }

    pub fn visible_episodes(&self) -> &[Episode] {
        let episodes = self.episodes();
        &episodes[episodes::batch_range(self.batch, episodes.len())]
    }

    /// Play the movie, or the first episode of the selected season. A series
    /// whose episodes are not loaded opens the episode browser instead.
    pub fn watch_now(&mut self) -> Result<WatchNow, DetailsError> {
        let route = self.route.ok_or(DetailsError::NotReady)?;
        self.details().ok_or(DetailsError::NotReady)?;

        match route.media_type {
            MediaType::Movie => {
                self.play_movie()?;
                Ok(WatchNow::Playing)
            }
            MediaType::Tv => match self.episodes().first().map(|e| e.episode_number) {
                Some(episode) => {
                    self.play_episode(episode)?;
                    Ok(WatchNow::Playing)
                }
                None => {
                    self.episodes_open = true;
                    Ok(WatchNow::BrowsingEpisodes)
                }
            },
        }
    }

    pub fn play_episode(&mut self, episode: u32) -> Result<(), DetailsError> {
        let route = self.route.ok_or(DetailsError::NotReady)?;
        if route.media_type != MediaType::Tv {
            return Err(DetailsError::WrongMediaType("series"));
        }
        let season = self.season.ok_or(DetailsError::NotReady)?;
        if !self.episodes().iter().any(|e| e.episode_number == episode) {
            return Err(DetailsError::UnknownEpisode(episode));
        }

        self.player = PlayerState {
            open: true,
            episode: Some(EpisodeRef { season, episode }),
        };
        Ok(())
    }

    pub fn play_movie(&mut self) -> Result<(), DetailsError> {
        let route = self.route.ok_or(DetailsError::NotReady)?;
        if route.media_type != MediaType::Movie {
            return Err(DetailsError::WrongMediaType("movies"));
        }
        self.details().ok_or(DetailsError::NotReady)?;

        self.player = PlayerState {
            open: true,
            episode: None,
        };
        Ok(())
    }

    pub fn is_player_open(&self) -> bool {
        self.player.open
    }

    /// Episode loaded into the player; `None` for movies or a closed player
    pub fn playing_episode(&self) -> Option<EpisodeRef> {
        self.player.episode
    }

    pub fn close_player(&mut self) {
        self.player = PlayerState::default();
    }

    pub fn providers(&self) -> &[EmbedProvider] {
        &self.providers
    }

    pub fn active_provider(&self) -> &EmbedProvider {
        &self.providers[self.active_provider]
    }

    /// Switch servers. An open player keeps its episode.
    pub fn select_provider(&mut self, id: &str) -> Result<(), DetailsError> {
        let index = self
            .providers
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DetailsError::UnknownProvider(id.to_string()))?;
        self.active_provider = index;
        Ok(())
    }

    /// URL of the open player for the active provider
    pub fn player_url(&self) -> Option<String> {
        if !self.player.open {
            return None;
        }
        let route = self.route?;
        Some(
            self.active_provider()
                .player_url(route.media_type, route.id, self.player.episode),
        )
    }

    pub fn trailer(&self) -> Option<&Video> {
        self.details()?.trailer()
    }

    pub fn open_trailer(&mut self) -> Result<(), DetailsError> {
        if self.trailer().is_none() {
            return Err(DetailsError::NoTrailer);
        }
        self.trailer_open = true;
        Ok(())
    }

    pub fn close_trailer(&mut self) {
        self.trailer_open = false;
    }

    pub fn is_trailer_open(&self) -> bool {
        self.trailer_open
    }

    pub fn trailer_url(&self) -> Option<String> {
        if !self.trailer_open {
            return None;
        }
        self.trailer().map(Video::embed_url)
    }

    pub fn is_favorite(&self, store: &AppStore) -> bool {
        self.route
            .is_some_and(|route| store.is_favorite(route.id, route.media_type))
    }

    /// Toggle the shown title in favorites; returns whether it is one afterwards
    pub fn toggle_favorite(&self, store: &mut AppStore) -> Result<bool, DetailsError> {
        let route = self.route.ok_or(DetailsError::NotReady)?;
        let details = self.details().ok_or(DetailsError::NotReady)?;
        Ok(store.toggle_favorite(&details.item, route.media_type))
    }
}
