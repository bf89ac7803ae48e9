use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{MediaItem, MediaType};

/// Current persisted format version
pub const FAVORITES_VERSION: u32 = 1;

/// Snapshot of a media item taken when it was favorited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub item: MediaItem,
    #[serde(rename = "mediaType")]
    pub media_type: MediaType,
}

impl FavoriteEntry {
    pub fn id(&self) -> u64 {
        self.item.id
    }
}

/// Favorited movies and series, each list unique by id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Favorites {
    movies: Vec<FavoriteEntry>,
    tv: Vec<FavoriteEntry>,
}

#[derive(Serialize)]
struct PersistedFavorites<'a> {
    version: u32,
    movies: &'a [FavoriteEntry],
    tv: &'a [FavoriteEntry],
}

impl Favorites {
    pub fn list(&self, media_type: MediaType) -> &[FavoriteEntry] {
        match media_type {
            MediaType::Movie => &self.movies,
            MediaType::Tv => &self.tv,
        }
    }

    fn list_mut(&mut self, media_type: MediaType) -> &mut Vec<FavoriteEntry> {
        match media_type {
            MediaType::Movie => &mut self.movies,
            MediaType::Tv => &mut self.tv,
        }
    }

    pub fn movies(&self) -> &[FavoriteEntry] {
        &self.movies
    }

    pub fn tv(&self) -> &[FavoriteEntry] {
        &self.tv
    }

    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.list(media_type).iter().any(|entry| entry.id() == id)
    }

    /// Append a snapshot of `item`; false if it was already present
    pub fn insert(&mut self, item: &MediaItem, media_type: MediaType) -> bool {
        if self.contains(item.id, media_type) {
            return false;
        }
        self.list_mut(media_type).push(FavoriteEntry {
            item: item.clone(),
            media_type,
        });
        true
    }

    /// Remove the entry for `id`; false if there was none
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> bool {
        let list = self.list_mut(media_type);
        let before = list.len();
        list.retain(|entry| entry.id() != id);
        list.len() != before
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.tv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> String {
        let persisted = PersistedFavorites {
            version: FAVORITES_VERSION,
            movies: &self.movies,
            tv: &self.tv,
        };
        serde_json::to_string(&persisted).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize favorites: {}", e);
            r#"{"version":1,"movies":[],"tv":[]}"#.to_string()
        })
    }

    /// Parse a persisted blob. Corrupt input yields an empty collection and
    /// unreadable entries are dropped one by one, so a single bad record never
    /// costs the user the whole list. Unversioned blobs are read as version 1.
    pub fn from_json(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring corrupt favorites data: {}", e);
                return Self::default();
            }
        };

        let Some(object) = value.as_object() else {
            tracing::warn!("Ignoring favorites data that is not an object");
            return Self::default();
        };

        match object.get("version").and_then(Value::as_u64) {
            None | Some(1) => {}
            Some(other) => tracing::warn!(
                "Favorites written by a newer format (version {}), reading what is recognizable",
                other
            ),
        }

        let mut favorites = Self::default();
        for (field, media_type) in [("movies", MediaType::Movie), ("tv", MediaType::Tv)] {
            let Some(entries) = object.get(field).and_then(Value::as_array) else {
                continue;
            };
            for entry in entries {
                match serde_json::from_value::<MediaItem>(entry.clone()) {
                    Ok(item) => {
                        favorites.insert(&item, media_type);
                    }
                    Err(e) => tracing::warn!("Dropping unreadable favorite in '{}': {}", field, e),
                }
            }
        }
        favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> MediaItem {
        MediaItem::new(id, &format!("Title {}", id))
    }

    #[test]
    fn test_insert_is_unique_per_type() {
        let mut favorites = Favorites::default();
        assert!(favorites.insert(&item(1), MediaType::Movie));
        assert!(!favorites.insert(&item(1), MediaType::Movie));
        assert!(favorites.insert(&item(1), MediaType::Tv));
        assert_eq!(favorites.movies().len(), 1);
        assert_eq!(favorites.tv().len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut favorites = Favorites::default();
        favorites.insert(&item(1), MediaType::Movie);
        favorites.insert(&item(2), MediaType::Movie);
        assert!(favorites.remove(1, MediaType::Movie));
        assert!(!favorites.remove(1, MediaType::Movie));
        assert!(!favorites.remove(2, MediaType::Tv));
        assert_eq!(favorites.movies()[0].id(), 2);
    }

    #[test]
    fn test_json_uses_versioned_shape() {
        let mut favorites = Favorites::default();
        favorites.insert(&item(42), MediaType::Movie);

        let value: Value = serde_json::from_str(&favorites.to_json()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["movies"][0]["id"], 42);
        assert_eq!(value["movies"][0]["mediaType"], "movie");
        assert_eq!(value["tv"], Value::Array(vec![]));

        assert_eq!(Favorites::from_json(&favorites.to_json()), favorites);
    }

    #[test]
    fn test_reads_unversioned_blob() {
        let raw = r#"{"movies":[{"id":1,"title":"A","mediaType":"movie"}],"tv":[{"id":2,"name":"B"}]}"#;
        let favorites = Favorites::from_json(raw);
        assert!(favorites.contains(1, MediaType::Movie));
        assert!(favorites.contains(2, MediaType::Tv));
        assert_eq!(favorites.tv()[0].media_type, MediaType::Tv);
    }

    #[test]
    fn test_corrupt_blob_defaults() {
        assert!(Favorites::from_json("{not json").is_empty());
        assert!(Favorites::from_json("[1,2,3]").is_empty());
        assert!(Favorites::from_json("null").is_empty());
    }

    #[test]
    fn test_missing_list_defaults_to_empty() {
        let favorites = Favorites::from_json(r#"{"movies":[{"id":1}]}"#);
        assert_eq!(favorites.movies().len(), 1);
        assert!(favorites.tv().is_empty());
    }

    #[test]
    fn test_bad_entries_dropped_individually() {
        let raw = r#"{"movies":[{"title":"no id"},{"id":"x"},{"id":7},{"id":7}],"tv":"oops"}"#;
        let favorites = Favorites::from_json(raw);
        assert_eq!(favorites.movies().len(), 1);
        assert_eq!(favorites.movies()[0].id(), 7);
        assert!(favorites.tv().is_empty());
    }
}
