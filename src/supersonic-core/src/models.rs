use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rendition of an image returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A named reference to another catalog entity (artist, album, author).
///
/// `id` is `None` when the catalog renders the name as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl EntityRef {
    pub fn new(name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Kind of entity a listing entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Song,
    Video,
    Album,
    Artist,
    Playlist,
    Podcast,
    Episode,
    Profile,
}

/// A single entry of any catalog listing: search results, chart entries,
/// home shelves, album/playlist tracks and watch-queue tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<ResultType>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(
        rename = "duration_seconds",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Player record for a single video.
///
/// Only `streamingData` is typed; everything else the catalog returns
/// (`videoDetails`, `playabilityStatus`, `microformat`, ...) passes through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_data: Option<StreamingData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Song {
    /// True when the catalog returned no record at all.
    pub fn is_empty(&self) -> bool {
        self.streaming_data.is_none() && self.extra.is_empty()
    }

    pub fn adaptive_formats(&self) -> &[StreamFormat] {
        self.streaming_data
            .as_ref()
            .map(|data| data.adaptive_formats.as_slice())
            .unwrap_or(&[])
    }

    pub fn video_id(&self) -> Option<&str> {
        self.extra
            .get("videoDetails")
            .and_then(|details| details.get("videoId"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    #[serde(default)]
    pub adaptive_formats: Vec<StreamFormat>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Adaptive format descriptor: one encoded variant of a media stream.
///
/// `url` is absent when the stream is protected by a signature cipher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StreamFormat {
    pub fn is_audio(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("audio/"))
    }

    pub fn has_direct_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Region chart with its ranked sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charts {
    pub countries: ChartCountries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<ChartSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending: Option<ChartSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<ChartSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<ChartSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCountries {
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<String>,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl ChartSection {
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub views: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub subscribers: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<ArtistShelf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<ArtistShelf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singles: Option<ArtistShelf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<ArtistShelf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlists: Option<ArtistShelf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<ArtistShelf>,
}

/// A shelf on an artist page; `browseId`/`params` lead to the full listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistShelf {
    #[serde(default)]
    pub browse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub title: String,
    #[serde(rename = "type", default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub artists: Vec<EntityRef>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub audio_playlist_id: Option<String>,
    #[serde(default)]
    pub tracks: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<EntityRef>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub tracks: Vec<CatalogItem>,
}

/// Autoplay queue for a seed video plus the browse ids of its side tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchPlaylist {
    #[serde(default)]
    pub tracks: Vec<CatalogItem>,
    #[serde(default)]
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub related: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    pub title: String,
    #[serde(default)]
    pub contents: Vec<CatalogItem>,
}
