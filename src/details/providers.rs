use serde::{Deserialize, Serialize};

use crate::api::MediaType;
use crate::details::EpisodeRef;

/// How a provider encodes the title and episode into its URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlShape {
    /// `{base}/{media_type}/{id}[/{season}/{episode}]`
    #[default]
    Path,
    /// `{base}{id}[&s={season}&e={episode}]`, base ends with the id parameter
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedProvider {
    pub id: String,
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub shape: UrlShape,
}

impl EmbedProvider {
    pub fn new(id: &str, name: &str, base_url: &str, shape: UrlShape) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_url: base_url.to_string(),
            shape,
        }
    }

    /// Player URL for a title. Season and episode are only encoded for series.
    pub fn player_url(&self, media_type: MediaType, id: u64, episode: Option<EpisodeRef>) -> String {
        let episode = episode.filter(|_| media_type == MediaType::Tv);

        match self.shape {
            UrlShape::Path => {
                let mut url = format!(
                    "{}/{}/{}",
                    self.base_url.trim_end_matches('/'),
                    media_type.as_str(),
                    id
                );
                if let Some(ep) = episode {
                    url.push_str(&format!("/{}/{}", ep.season, ep.episode));
                }
                url
            }
            UrlShape::Query => {
                let mut url = format!("{}{}", self.base_url, id);
                if let Some(ep) = episode {
                    url.push_str(&format!("&s={}&e={}", ep.season, ep.episode));
                }
                url
            }
        }
    }
}

/// The default server list, in priority order
pub fn builtin_providers() -> Vec<EmbedProvider> {
    vec![
        EmbedProvider::new("vidsrc-to", "Server 1", "https://vidsrc.to/embed", UrlShape::Path),
        EmbedProvider::new("vidsrc-me", "Server 2", "https://vidsrc.me/embed", UrlShape::Path),
        EmbedProvider::new(
            "multiembed",
            "Server 3",
            "https://multiembed.mov/directstream.php?video_id=",
            UrlShape::Query,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> EmbedProvider {
        builtin_providers()
            .into_iter()
            .find(|p| p.id == id)
            .unwrap()
    }

    #[test]
    fn test_path_shape_movie() {
        let url = provider("vidsrc-to").player_url(MediaType::Movie, 550, None);
        assert_eq!(url, "https://vidsrc.to/embed/movie/550");
    }

    #[test]
    fn test_path_shape_episode() {
        let url = provider("vidsrc-me").player_url(
            MediaType::Tv,
            1396,
            Some(EpisodeRef { season: 2, episode: 5 }),
        );
        assert_eq!(url, "https://vidsrc.me/embed/tv/1396/2/5");
    }

    #[test]
    fn test_query_shape() {
        let p = provider("multiembed");
        assert_eq!(
            p.player_url(MediaType::Movie, 550, None),
            "https://multiembed.mov/directstream.php?video_id=550"
        );
        assert_eq!(
            p.player_url(MediaType::Tv, 1396, Some(EpisodeRef { season: 1, episode: 3 })),
            "https://multiembed.mov/directstream.php?video_id=1396&s=1&e=3"
        );
    }

    #[test]
    fn test_movie_ignores_episode() {
        let url = provider("vidsrc-to").player_url(
            MediaType::Movie,
            550,
            Some(EpisodeRef { season: 1, episode: 1 }),
        );
        assert_eq!(url, "https://vidsrc.to/embed/movie/550");
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let p = EmbedProvider::new("x", "X", "https://x.example/embed/", UrlShape::Path);
        assert_eq!(p.player_url(MediaType::Movie, 1, None), "https://x.example/embed/movie/1");
    }
}
