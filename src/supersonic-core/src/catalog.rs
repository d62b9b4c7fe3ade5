use crate::models::{
    Album, Artist, CatalogItem, Charts, HomeSection, Lyrics, Playlist, ResultType, Song,
    WatchPlaylist,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Common categories of catalog failures surfaced to the command layer.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("server returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },
    #[error("failed to decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{message}")]
    InvalidArgument { message: String },
    #[error("entity not found: {entity}")]
    NotFound { entity: String },
    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
    #[error("{message}")]
    Other { message: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result category requested from a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    #[default]
    Songs,
    Videos,
    Albums,
    Artists,
    Playlists,
    CommunityPlaylists,
    FeaturedPlaylists,
}

impl SearchFilter {
    pub const ALL: [SearchFilter; 7] = [
        SearchFilter::Songs,
        SearchFilter::Videos,
        SearchFilter::Albums,
        SearchFilter::Artists,
        SearchFilter::Playlists,
        SearchFilter::CommunityPlaylists,
        SearchFilter::FeaturedPlaylists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Songs => "songs",
            SearchFilter::Videos => "videos",
            SearchFilter::Albums => "albums",
            SearchFilter::Artists => "artists",
            SearchFilter::Playlists => "playlists",
            SearchFilter::CommunityPlaylists => "community_playlists",
            SearchFilter::FeaturedPlaylists => "featured_playlists",
        }
    }

    /// Result type every entry of a filtered search carries.
    pub fn result_type(&self) -> ResultType {
        match self {
            SearchFilter::Songs => ResultType::Song,
            SearchFilter::Videos => ResultType::Video,
            SearchFilter::Albums => ResultType::Album,
            SearchFilter::Artists => ResultType::Artist,
            SearchFilter::Playlists
            | SearchFilter::CommunityPlaylists
            | SearchFilter::FeaturedPlaylists => ResultType::Playlist,
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchFilter {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SearchFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == value)
            .ok_or_else(|| {
                let names: Vec<&str> = SearchFilter::ALL.iter().map(|f| f.as_str()).collect();
                CatalogError::InvalidArgument {
                    message: format!(
                        "Invalid filter provided. Please use one of the following filters or leave out the parameter: {}",
                        names.join(", ")
                    ),
                }
            })
    }
}

/// Music catalog interface.
///
/// Every command handler receives the catalog by reference; nothing holds a
/// process-wide client.
#[async_trait::async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Stable catalog identifier (e.g., "ytmusic").
    fn id(&self) -> &str;

    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> CatalogResult<Vec<CatalogItem>>;

    /// Region chart for an ISO 3166-1 alpha-2 country code.
    async fn get_charts(&self, country: &str) -> CatalogResult<Charts>;

    /// Player record, including streaming formats, for a video.
    async fn get_song(&self, video_id: &str) -> CatalogResult<Song>;

    async fn get_artist(&self, _channel_id: &str) -> CatalogResult<Artist> {
        Err(CatalogError::NotSupported {
            operation: "get_artist".into(),
        })
    }

    async fn get_album(&self, _browse_id: &str) -> CatalogResult<Album> {
        Err(CatalogError::NotSupported {
            operation: "get_album".into(),
        })
    }

    async fn get_playlist(&self, _playlist_id: &str, _limit: usize) -> CatalogResult<Playlist> {
        Err(CatalogError::NotSupported {
            operation: "get_playlist".into(),
        })
    }

    async fn get_watch_playlist(
        &self,
        _video_id: &str,
        _limit: usize,
    ) -> CatalogResult<WatchPlaylist> {
        Err(CatalogError::NotSupported {
            operation: "get_watch_playlist".into(),
        })
    }

    async fn get_lyrics(&self, _browse_id: &str) -> CatalogResult<Lyrics> {
        Err(CatalogError::NotSupported {
            operation: "get_lyrics".into(),
        })
    }

    /// Home feed shelves, at most `limit` of them.
    async fn get_home(&self, _limit: usize) -> CatalogResult<Vec<HomeSection>> {
        Err(CatalogError::NotSupported {
            operation: "get_home".into(),
        })
    }
}
