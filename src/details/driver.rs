use std::sync::Arc;

use tokio::task::JoinSet;

use super::{DetailsMsg, DetailsView, Effect, Route};
use crate::api::MetadataSource;
use crate::i18n::Locale;

pub struct DetailsDriver {
    source: Arc<dyn MetadataSource>,
    tasks: JoinSet<DetailsMsg>,
}

impl DetailsDriver {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            tasks: JoinSet::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        let source = Arc::clone(&self.source);

        self.tasks.spawn(async move {
            match effect {
                Effect::FetchDetails(request) => {
                    let key = request.key().clone();
                    let result = source
                        .details(key.route.media_type, key.route.id, key.locale)
                        .await;
                    DetailsMsg::DetailsLoaded(request, result)
                }
                Effect::FetchFallbackVideos { request, locale } => {
                    let route = request.key().route;
                    let result = source.videos(route.media_type, route.id, locale).await;
                    DetailsMsg::FallbackVideosLoaded(request, result)
                }
                Effect::FetchEpisodes(request) => {
                    let key = request.key().clone();
                    let result = source.season(key.series_id, key.season, key.locale).await;
                    DetailsMsg::EpisodesLoaded(request, result)
                }
            }
        });
    }

    /// Next finished fetch, or `None` when nothing is in flight.
    /// A task that panicked is logged and skipped.
    pub async fn next(&mut self) -> Option<DetailsMsg> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(msg) => return Some(msg),
                Err(e) => tracing::warn!("Details fetch task failed: {}", e),
            }
        }
        None
    }

    /// Apply one finished fetch to `view` and dispatch its follow-ups
    pub async fn step(&mut self, view: &mut DetailsView) -> bool {
        match self.next().await {
            Some(msg) => {
                let effects = view.apply(msg);
                self.dispatch(effects);
                true
            }
            None => false,
        }
    }

    /// Run until no fetch is left in flight
    pub async fn settle(&mut self, view: &mut DetailsView) {
        while self.step(view).await {}
    }
}

/// Mount `view` on `route` and wait until its details and episodes are in
pub async fn run_details(
    source: Arc<dyn MetadataSource>,
    view: &mut DetailsView,
    route: Route,
    locale: Locale,
) -> DetailsDriver {
    let mut driver = DetailsDriver::new(source);
    driver.dispatch(view.mount(route, locale));
    driver.settle(view).await;
    driver
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::api::{
        DiscoverFilters, Genre, MediaDetails, MediaItem, MediaType, MockSource, Page, SearchScope,
        SeasonDetails, TimeWindow, Video,
    };
    use crate::details::providers::builtin_providers;
    use crate::details::{DetailsPhase, EpisodesPhase};
    use crate::error::ApiError;

    /// Demo data, except one season that waits for a signal before answering
    /// and optionally one whose fetch panics
    struct GatedSource {
        inner: MockSource,
        gated_season: u32,
        gate: Arc<Notify>,
        broken_season: Option<u32>,
    }

    #[async_trait]
    impl MetadataSource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn trending(
            &self,
            media_type: Option<MediaType>,
            window: TimeWindow,
            locale: Locale,
            page: u32,
        ) -> Result<Page<MediaItem>, ApiError> {
            self.inner.trending(media_type, window, locale, page).await
        }

        async fn popular(
            &self,
            media_type: MediaType,
            locale: Locale,
            page: u32,
        ) -> Result<Page<MediaItem>, ApiError> {
            self.inner.popular(media_type, locale, page).await
        }

        async fn top_rated(
            &self,
            media_type: MediaType,
            locale: Locale,
            page: u32,
        ) -> Result<Page<MediaItem>, ApiError> {
            self.inner.top_rated(media_type, locale, page).await
        }

        async fn discover(
            &self,
            media_type: MediaType,
            filters: &DiscoverFilters,
            locale: Locale,
        ) -> Result<Page<MediaItem>, ApiError> {
            self.inner.discover(media_type, filters, locale).await
        }

        async fn search(
            &self,
            query: &str,
            scope: SearchScope,
            locale: Locale,
            page: u32,
        ) -> Result<Page<MediaItem>, ApiError> {
            self.inner.search(query, scope, locale, page).await
        }

        async fn details(
            &self,
            media_type: MediaType,
            id: u64,
            locale: Locale,
        ) -> Result<MediaDetails, ApiError> {
            self.inner.details(media_type, id, locale).await
        }

        async fn videos(
            &self,
            media_type: MediaType,
            id: u64,
            locale: Locale,
        ) -> Result<Vec<Video>, ApiError> {
            self.inner.videos(media_type, id, locale).await
        }

        async fn season(
            &self,
            series_id: u64,
            season_number: u32,
            locale: Locale,
        ) -> Result<SeasonDetails, ApiError> {
            if season_number == self.gated_season {
                self.gate.notified().await;
            }
            if self.broken_season == Some(season_number) {
                panic!("season {} fetch crashed", season_number);
            }
            self.inner.season(series_id, season_number, locale).await
        }

        async fn genres(&self, media_type: MediaType, locale: Locale) -> Result<Vec<Genre>, ApiError> {
            self.inner.genres(media_type, locale).await
        }
    }

    fn gated(season: u32) -> (Arc<Notify>, Arc<dyn MetadataSource>) {
        let gate = Arc::new(Notify::new());
        let source: Arc<dyn MetadataSource> = Arc::new(GatedSource {
            inner: MockSource::new(),
            gated_season: season,
            gate: Arc::clone(&gate),
            broken_season: None,
        });
        (gate, source)
    }

    #[tokio::test]
    async fn test_run_details_loads_series() {
        let mut view = DetailsView::new(builtin_providers());
        let driver = run_details(
            Arc::new(MockSource::new()),
            &mut view,
            Route::new(MediaType::Tv, 1396),
            Locale::ArSa,
        )
        .await;

        assert_eq!(driver.in_flight(), 0);
        assert!(matches!(view.details_phase(), DetailsPhase::Ready(_)));
        assert_eq!(view.season(), Some(1));
        assert_eq!(view.episodes().len(), 50);
        assert_eq!(view.batch_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_title_fails_softly() {
        let mut view = DetailsView::new(builtin_providers());
        run_details(
            Arc::new(MockSource::new()),
            &mut view,
            Route::new(MediaType::Movie, 1),
            Locale::EnUs,
        )
        .await;

        assert!(matches!(view.details_phase(), DetailsPhase::Failed(_)));
    }

    #[tokio::test]
    async fn test_slow_season_does_not_overwrite_newer_one() {
        let (gate, source) = gated(1);
        let mut view = DetailsView::new(builtin_providers());
        let mut driver = DetailsDriver::new(source);

        driver.dispatch(view.mount(Route::new(MediaType::Tv, 70523), Locale::EnUs));
        assert!(driver.step(&mut view).await);
        assert_eq!(view.season(), Some(1));
        assert_eq!(view.episodes_phase(), EpisodesPhase::Loading { season: 1 });

        driver.dispatch(view.select_season(2).unwrap());
        assert!(driver.step(&mut view).await);
        assert!(matches!(
            view.episodes_phase(),
            EpisodesPhase::Ready { season: 2, .. }
        ));

        gate.notify_one();
        driver.settle(&mut view).await;
        assert_eq!(driver.in_flight(), 0);
        assert_eq!(view.season(), Some(2));
        assert_eq!(view.episodes()[0].season_number, Some(2));
    }

    #[tokio::test]
    async fn test_unmounted_view_ignores_late_results() {
        let (gate, source) = gated(1);
        let mut view = DetailsView::new(builtin_providers());
        let mut driver = DetailsDriver::new(source);

        driver.dispatch(view.mount(Route::new(MediaType::Tv, 1396), Locale::EnUs));
        assert!(driver.step(&mut view).await);
        view.unmount();

        gate.notify_one();
        driver.settle(&mut view).await;
        assert!(view.episodes().is_empty());
    }

    #[tokio::test]
    async fn test_crashed_fetch_does_not_stall_settle() {
        let source: Arc<dyn MetadataSource> = Arc::new(GatedSource {
            inner: MockSource::new(),
            gated_season: u32::MAX,
            gate: Arc::new(Notify::new()),
            broken_season: Some(1),
        });
        let mut view = DetailsView::new(builtin_providers());
        let driver = run_details(source, &mut view, Route::new(MediaType::Tv, 1396), Locale::EnUs).await;

        assert_eq!(driver.in_flight(), 0);
        assert!(matches!(view.details_phase(), DetailsPhase::Ready(_)));
        assert_eq!(view.episodes_phase(), EpisodesPhase::Loading { season: 1 });
    }
}
