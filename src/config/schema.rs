use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::media::TMDB_IMAGE_BASE;
use crate::details::providers::{builtin_providers, EmbedProvider};
use crate::i18n::Language;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Embed providers ordered by priority, the first one is the default
    #[serde(default = "builtin_providers")]
    pub providers: Vec<EmbedProvider>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb: TmdbConfig::default(),
            ui: UiConfig::default(),
            player: PlayerConfig::default(),
            storage: StorageConfig::default(),
            providers: builtin_providers(),
        }
    }
}

impl Config {
    /// Create a new config with just the API key, using defaults for everything else
    pub fn new(tmdb_api_key: String) -> Self {
        Self {
            tmdb: TmdbConfig {
                api_key: tmdb_api_key,
                ..TmdbConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check if the config has an API key (demo data is used otherwise)
    pub fn has_api_key(&self) -> bool {
        !self.tmdb.api_key.trim().is_empty()
    }

    /// Configured providers, or the built-in list if the config names none
    pub fn embed_providers(&self) -> Vec<EmbedProvider> {
        if self.providers.is_empty() {
            builtin_providers()
        } else {
            self.providers.clone()
        }
    }
}

/// TMDB configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    TMDB_IMAGE_BASE.to_string()
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Language used until one has been chosen and persisted: "ar" | "en"
    #[serde(default)]
    pub default_language: Language,
}

/// Command used to open player and trailer URLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_command")]
    pub command: String,

    /// Additional arguments passed before the URL
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: Vec::new(),
        }
    }
}

fn default_player_command() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else if cfg!(target_os = "windows") {
        "explorer".to_string()
    } else {
        "xdg-open".to_string()
    }
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the state database location
    #[serde(default)]
    pub path: Option<PathBuf>,
}
