//! YouTube Music catalog over the innertube JSON API.

mod browse;
mod client;
mod mapping;
mod navigation;
mod search;
mod watch;

use client::InnertubeClient;
use supersonic_core::catalog::{CatalogResult, MusicCatalog, SearchFilter};
use supersonic_core::config::CatalogConfig;
use supersonic_core::models::{
    Album, Artist, CatalogItem, Charts, HomeSection, Lyrics, Playlist, Song, WatchPlaylist,
};

pub use browse::LYRICS_MISSING;
pub use watch::WATCH_TARGET_MISSING;

pub const CATALOG_ID: &str = "ytmusic";

#[derive(Debug, Clone)]
pub struct YtMusicCatalog {
    id: String,
    client: InnertubeClient,
}

impl YtMusicCatalog {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        Ok(Self {
            id: CATALOG_ID.into(),
            client: InnertubeClient::new(config)?,
        })
    }
}

#[async_trait::async_trait]
impl MusicCatalog for YtMusicCatalog {
    fn id(&self) -> &str {
        &self.id
    }

    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> CatalogResult<Vec<CatalogItem>> {
        search::search(&self.client, query, filter, limit).await
    }

    async fn get_charts(&self, country: &str) -> CatalogResult<Charts> {
        browse::charts(&self.client, country).await
    }

    async fn get_song(&self, video_id: &str) -> CatalogResult<Song> {
        watch::song(&self.client, video_id).await
    }

    async fn get_artist(&self, channel_id: &str) -> CatalogResult<Artist> {
        browse::artist(&self.client, channel_id).await
    }

    async fn get_album(&self, browse_id: &str) -> CatalogResult<Album> {
        browse::album(&self.client, browse_id).await
    }

    async fn get_playlist(&self, playlist_id: &str, limit: usize) -> CatalogResult<Playlist> {
        browse::playlist(&self.client, playlist_id, limit).await
    }

    async fn get_watch_playlist(
        &self,
        video_id: &str,
        limit: usize,
    ) -> CatalogResult<WatchPlaylist> {
        watch::watch_playlist(&self.client, video_id, limit).await
    }

    async fn get_lyrics(&self, browse_id: &str) -> CatalogResult<Lyrics> {
        browse::lyrics(&self.client, browse_id).await
    }

    async fn get_home(&self, limit: usize) -> CatalogResult<Vec<HomeSection>> {
        browse::home(&self.client, limit).await
    }
}
