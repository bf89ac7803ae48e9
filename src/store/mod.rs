mod favorites;

pub use favorites::{FavoriteEntry, Favorites};

use tokio::sync::watch;

use crate::api::{MediaItem, MediaType};
use crate::error::UsageError;
use crate::i18n::{self, Language, Locale, TextDirection};
use crate::storage::{Storage, FAVORITES_KEY, LANGUAGE_KEY};

pub struct AppStore {
    storage: Box<dyn Storage>,
    language: Language,
    favorites: Favorites,
    language_tx: watch::Sender<Language>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("language", &self.language)
            .field("favorites", &self.favorites.len())
            .finish()
    }
}

impl AppStore {
    /// Read persisted state; `default_language` applies only when none was saved
    pub fn hydrate(storage: Box<dyn Storage>, default_language: Language) -> Self {
        let language = match storage.load(LANGUAGE_KEY) {
            Some(code) => Language::from_code(&code).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown stored language '{}'", code);
                default_language
            }),
            None => default_language,
        };

        let favorites = storage
            .load(FAVORITES_KEY)
            .map(|raw| Favorites::from_json(&raw))
            .unwrap_or_default();

        tracing::debug!(
            "Hydrated store: language={}, {} favorites",
            language,
            favorites.len()
        );

        let (language_tx, _) = watch::channel(language);
        Self {
            storage,
            language,
            favorites,
            language_tx,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Flip between the two languages and persist the choice
    pub fn toggle_language(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.storage.save(LANGUAGE_KEY, language.code());
        self.language_tx.send_replace(language);
    }

    /// Observe language changes, e.g. to refetch locale-dependent data
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.language_tx.subscribe()
    }

    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        i18n::translate(self.language, key)
    }

    pub fn api_locale(&self) -> Locale {
        self.language.locale()
    }

    pub fn direction(&self) -> TextDirection {
        self.language.direction()
    }

    /// Document language tag
    pub fn html_lang(&self) -> &'static str {
        self.language.code()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, id: u64, media_type: MediaType) -> bool {
        self.favorites.contains(id, media_type)
    }

    /// Add a snapshot of `item`; a no-op when it is already a favorite
    pub fn add_favorite(&mut self, item: &MediaItem, media_type: MediaType) {
        if self.favorites.insert(item, media_type) {
            tracing::debug!("Added {} {} to favorites", media_type, item.id);
            self.persist_favorites();
        }
    }

    pub fn remove_favorite(&mut self, id: u64, media_type: MediaType) {
        if self.favorites.remove(id, media_type) {
            tracing::debug!("Removed {} {} from favorites", media_type, id);
        }
        self.persist_favorites();
    }

    /// Returns whether the item is a favorite afterwards
    pub fn toggle_favorite(&mut self, item: &MediaItem, media_type: MediaType) -> bool {
        if self.is_favorite(item.id, media_type) {
            self.remove_favorite(item.id, media_type);
            false
        } else {
            self.add_favorite(item, media_type);
            true
        }
    }

    fn persist_favorites(&self) {
        self.storage.save(FAVORITES_KEY, &self.favorites.to_json());
    }
}

/// Scope that provides the store to commands
#[derive(Debug, Default)]
pub struct AppContext {
    store: Option<AppStore>,
}

impl AppContext {
    pub fn provide(store: AppStore) -> Self {
        Self { store: Some(store) }
    }

    /// A context without a store. Every accessor fails.
    #[allow(dead_code)]
    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn store(&self) -> Result<&AppStore, UsageError> {
        self.store.as_ref().ok_or(UsageError::NotProvided("AppStore"))
    }

    pub fn store_mut(&mut self) -> Result<&mut AppStore, UsageError> {
        self.store.as_mut().ok_or(UsageError::NotProvided("AppStore"))
    }

    /// End the provisioning scope, handing the store back
    pub fn shutdown(self) -> Option<AppStore> {
        if self.store.is_some() {
            tracing::debug!("Shutting down app context");
        }
        self.store
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store_with(storage: MemoryStorage) -> AppStore {
        AppStore::hydrate(Box::new(storage), Language::Arabic)
    }

    fn shared_store() -> (Rc<MemoryStorage>, AppStore) {
        let storage = Rc::new(MemoryStorage::new());
        let store = AppStore::hydrate(Box::new(Rc::clone(&storage)), Language::Arabic);
        (storage, store)
    }

    fn movie(id: u64) -> MediaItem {
        MediaItem::new(id, "Fight Club")
    }

    #[test]
    fn test_defaults_without_stored_data() {
        let store = store_with(MemoryStorage::new());
        assert_eq!(store.language(), Language::Arabic);
        assert_eq!(store.direction(), TextDirection::Rtl);
        assert_eq!(store.api_locale(), Locale::ArSa);
        assert!(store.favorites().movies().is_empty());
        assert!(store.favorites().tv().is_empty());
    }

    #[test]
    fn test_configured_default_language() {
        let store = AppStore::hydrate(Box::new(MemoryStorage::new()), Language::English);
        assert_eq!(store.language(), Language::English);

        let store = AppStore::hydrate(
            Box::new(MemoryStorage::new().with(LANGUAGE_KEY, "ar")),
            Language::English,
        );
        assert_eq!(store.language(), Language::Arabic);
    }

    #[test]
    fn test_unknown_stored_language_falls_back() {
        let store = store_with(MemoryStorage::new().with(LANGUAGE_KEY, "fr"));
        assert_eq!(store.language(), Language::Arabic);
    }

    #[test]
    fn test_toggle_language_is_its_own_inverse() {
        let (storage, mut store) = shared_store();
        let original = (store.language(), store.direction());

        assert_eq!(store.toggle_language(), Language::English);
        assert_eq!(store.direction(), TextDirection::Ltr);
        assert_eq!(store.api_locale(), Locale::EnUs);
        assert_eq!(store.html_lang(), "en");
        assert_eq!(storage.load(LANGUAGE_KEY).as_deref(), Some("en"));

        store.toggle_language();
        assert_eq!((store.language(), store.direction()), original);
        assert_eq!(storage.load(LANGUAGE_KEY).as_deref(), Some("ar"));
    }

    #[test]
    fn test_translate_follows_language() {
        let mut store = store_with(MemoryStorage::new());
        assert_eq!(store.translate("home"), "الرئيسية");
        store.toggle_language();
        assert_eq!(store.translate("home"), "Home");
        assert_eq!(store.translate("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_subscribers_see_language_changes() {
        let mut store = store_with(MemoryStorage::new());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.toggle_language();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Language::English);
    }

    #[test]
    fn test_add_favorite_scenario() {
        let (storage, mut store) = shared_store();
        assert!(!store.is_favorite(42, MediaType::Movie));

        store.add_favorite(&movie(42), MediaType::Movie);
        assert!(store.is_favorite(42, MediaType::Movie));
        assert!(!store.is_favorite(42, MediaType::Tv));
        assert_eq!(store.favorites().movies().len(), 1);
        assert_eq!(store.favorites().tv().len(), 0);

        let persisted = Favorites::from_json(&storage.load(FAVORITES_KEY).unwrap());
        assert_eq!(&persisted, store.favorites());
    }

    #[test]
    fn test_add_favorite_twice_keeps_one() {
        let mut store = store_with(MemoryStorage::new());
        store.add_favorite(&movie(42), MediaType::Movie);
        store.add_favorite(&movie(42), MediaType::Movie);
        assert_eq!(store.favorites().movies().len(), 1);
    }

    #[test]
    fn test_toggle_favorite_round_trip() {
        let mut store = store_with(MemoryStorage::new());
        store.add_favorite(&movie(1), MediaType::Movie);
        store.add_favorite(&MediaItem::new(2, "Dark"), MediaType::Tv);

        for (item, media_type) in [
            (movie(1), MediaType::Movie),
            (movie(3), MediaType::Movie),
            (MediaItem::new(2, "Dark"), MediaType::Tv),
        ] {
            let before = store.favorites().clone();
            let first = store.toggle_favorite(&item, media_type);
            let second = store.toggle_favorite(&item, media_type);
            assert_ne!(first, second);
            assert_eq!(store.favorites(), &before);
        }
    }

    #[test]
    fn test_remove_persists_even_when_absent() {
        let (storage, mut store) = shared_store();
        assert!(storage.load(FAVORITES_KEY).is_none());
        store.remove_favorite(9, MediaType::Tv);
        assert!(storage.load(FAVORITES_KEY).is_some());
    }

    #[test]
    fn test_hydrates_favorites_and_survives_corruption() {
        let mut original = store_with(MemoryStorage::new());
        original.add_favorite(&movie(5), MediaType::Movie);
        let blob = original.favorites().to_json();

        let store = store_with(MemoryStorage::new().with(FAVORITES_KEY, &blob));
        assert!(store.is_favorite(5, MediaType::Movie));

        let store = store_with(MemoryStorage::new().with(FAVORITES_KEY, "{{garbage"));
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_context_fails_fast_when_detached() {
        let mut ctx = AppContext::detached();
        assert_eq!(ctx.store().unwrap_err(), UsageError::NotProvided("AppStore"));
        assert!(ctx.store_mut().is_err());
        assert!(ctx.shutdown().is_none());
    }

    #[test]
    fn test_context_provides_shared_store() {
        let mut ctx = AppContext::provide(store_with(MemoryStorage::new()));
        ctx.store_mut().unwrap().add_favorite(&movie(7), MediaType::Movie);
        assert!(ctx.store().unwrap().is_favorite(7, MediaType::Movie));

        let store = ctx.shutdown().unwrap();
        assert!(store.is_favorite(7, MediaType::Movie));
    }
}
