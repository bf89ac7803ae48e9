use crate::api::{MediaItem, MetadataSource, Page, SearchScope};
use crate::catalog::pagination::{clamp_total, MAX_PAGES};
use crate::fetch::{FetchHook, FetchState};
use crate::i18n::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub query: String,
    pub scope: SearchScope,
    pub page: u32,
    pub locale: Locale,
}

#[derive(Debug, Default)]
pub struct SearchView {
    query: String,
    scope: SearchScope,
    page: u32,
    results: FetchHook<SearchKey, Page<MediaItem>>,
}

impl SearchView {
    pub fn new(query: &str) -> Self {
        let mut view = Self::default();
        view.set_query(query);
        view
    }

    /// A new query starts over at page 1. Blank input keeps the previous query.
    pub fn set_query(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.query = query.to_string();
        self.page = 1;
    }

    pub fn set_scope(&mut self, scope: SearchScope) {
        self.scope = scope;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.clamp(1, MAX_PAGES);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn state(&self) -> &FetchState<Page<MediaItem>> {
        self.results.state()
    }

    /// Fetch the current query. Without a query nothing is fetched and the
    /// results are cleared.
    pub async fn load(&mut self, source: &dyn MetadataSource, locale: Locale) -> bool {
        if self.query.is_empty() {
            self.results.reset();
            return false;
        }

        let key = SearchKey {
            query: self.query.clone(),
            scope: self.scope,
            page: self.page(),
            locale,
        };
        self.results
            .run(key, |key| async move {
                let mut page = source
                    .search(&key.query, key.scope, key.locale, key.page)
                    .await?;
                page.results.retain(|item| !item.is_person());
                page.total_pages = clamp_total(page.total_pages);
                Ok::<_, crate::error::ApiError>(page)
            })
            .await
    }

    /// Results without people, empty until something was found
    pub fn results(&self) -> &[MediaItem] {
        self.results
            .state()
            .ready()
            .map(|page| page.results.as_slice())
            .unwrap_or_default()
    }

    pub fn total_pages(&self) -> u32 {
        self.results.data().map_or(1, |page| page.total_pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSource;

    #[tokio::test]
    async fn test_empty_query_does_not_fetch() {
        let mut view = SearchView::new("   ");
        assert!(!view.load(&MockSource::new(), Locale::EnUs).await);
        assert!(view.results().is_empty());
        assert!(!view.state().loading);
    }

    #[tokio::test]
    async fn test_search_finds_titles() {
        let mut view = SearchView::new("dark");
        assert!(view.load(&MockSource::new(), Locale::EnUs).await);
        assert_eq!(view.results().len(), 1);
        assert_eq!(view.results()[0].display_title(), "Dark");

        // Same key again is a no-op
        assert!(!view.load(&MockSource::new(), Locale::EnUs).await);
    }

    #[tokio::test]
    async fn test_scope_restricts_results() {
        let mut view = SearchView::new("dark");
        view.set_scope(SearchScope::Movie);
        view.load(&MockSource::new(), Locale::EnUs).await;
        assert!(view.results().is_empty());
    }

    #[test]
    fn test_new_query_resets_page() {
        let mut view = SearchView::new("first");
        view.page = 4;
        view.set_query("second");
        assert_eq!(view.page(), 1);
        assert_eq!(view.query(), "second");

        view.set_query("  ");
        assert_eq!(view.query(), "second");
    }
}
