use serde::Serialize;
use serde_json::Value;
use supersonic_core::{
    resolve_trending, select_audio_format, CatalogError, MusicCatalog, Quality, SearchFilter,
    SelectionError, TrendingConfig,
};
use thiserror::Error;

/// Number of home feed shelves requested by `get_home`.
pub const HOME_SECTIONS: usize = 10;

/// A parsed invocation: command name plus its positional arguments, with
/// missing positionals already replaced by their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search {
        query: String,
        filter: String,
        limit: usize,
    },
    GetTrending {
        limit: usize,
    },
    GetSong {
        video_id: String,
    },
    GetArtist {
        artist_id: String,
    },
    GetAlbum {
        album_id: String,
    },
    GetPlaylist {
        playlist_id: String,
        limit: usize,
    },
    GetWatchPlaylist {
        video_id: String,
        limit: usize,
    },
    GetLyrics {
        browse_id: String,
    },
    GetHome,
    GetCharts {
        country: String,
    },
    GetAudioUrl {
        video_id: String,
        quality: String,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid limit '{0}': expected a non-negative integer")]
    InvalidLimit(String),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Selection(#[from] SelectionError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommandError {
    pub fn has_formats(&self) -> Option<bool> {
        match self {
            CommandError::Selection(err) => err.has_formats(),
            _ => None,
        }
    }
}

/// Positional arguments following the command name.
struct Positionals<'a>(&'a [String]);

impl Positionals<'_> {
    fn text(&self, index: usize, default: &str) -> String {
        self.0
            .get(index)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn limit(&self, index: usize, default: usize) -> Result<usize, CommandError> {
        match self.0.get(index) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| CommandError::InvalidLimit(raw.clone())),
        }
    }
}

impl Command {
    pub fn from_args(name: &str, args: &[String]) -> Result<Self, CommandError> {
        let args = Positionals(args);
        let command = match name {
            "search" => Command::Search {
                query: args.text(0, ""),
                filter: args.text(1, SearchFilter::Songs.as_str()),
                limit: args.limit(2, 20)?,
            },
            "get_trending" => Command::GetTrending {
                limit: args.limit(0, 25)?,
            },
            "get_song" => Command::GetSong {
                video_id: args.text(0, ""),
            },
            "get_artist" => Command::GetArtist {
                artist_id: args.text(0, ""),
            },
            "get_album" => Command::GetAlbum {
                album_id: args.text(0, ""),
            },
            "get_playlist" => Command::GetPlaylist {
                playlist_id: args.text(0, ""),
                limit: args.limit(1, 50)?,
            },
            "get_watch_playlist" => Command::GetWatchPlaylist {
                video_id: args.text(0, ""),
                limit: args.limit(1, 25)?,
            },
            "get_lyrics" => Command::GetLyrics {
                browse_id: args.text(0, ""),
            },
            "get_home" => Command::GetHome,
            "get_charts" => Command::GetCharts {
                country: args.text(0, "IN"),
            },
            "get_audio_url" => Command::GetAudioUrl {
                video_id: args.text(0, ""),
                quality: args.text(1, "high"),
            },
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Search { .. } => "search",
            Command::GetTrending { .. } => "get_trending",
            Command::GetSong { .. } => "get_song",
            Command::GetArtist { .. } => "get_artist",
            Command::GetAlbum { .. } => "get_album",
            Command::GetPlaylist { .. } => "get_playlist",
            Command::GetWatchPlaylist { .. } => "get_watch_playlist",
            Command::GetLyrics { .. } => "get_lyrics",
            Command::GetHome => "get_home",
            Command::GetCharts { .. } => "get_charts",
            Command::GetAudioUrl { .. } => "get_audio_url",
        }
    }
}

fn encode<T: Serialize>(value: T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(value)?)
}

/// Runs one command against the catalog and returns its success payload.
pub async fn execute(
    command: &Command,
    catalog: &dyn MusicCatalog,
    trending: &TrendingConfig,
) -> Result<Value, CommandError> {
    tracing::debug!(command = command.name(), catalog = catalog.id(), "executing");
    match command {
        Command::Search {
            query,
            filter,
            limit,
        } => {
            let filter: SearchFilter = filter.parse()?;
            encode(catalog.search(query, filter, *limit).await?)
        }
        Command::GetTrending { limit } => encode(resolve_trending(catalog, trending, *limit).await?),
        Command::GetSong { video_id } => encode(catalog.get_song(video_id).await?),
        Command::GetArtist { artist_id } => encode(catalog.get_artist(artist_id).await?),
        Command::GetAlbum { album_id } => encode(catalog.get_album(album_id).await?),
        Command::GetPlaylist { playlist_id, limit } => {
            encode(catalog.get_playlist(playlist_id, *limit).await?)
        }
        Command::GetWatchPlaylist { video_id, limit } => {
            encode(catalog.get_watch_playlist(video_id, *limit).await?)
        }
        Command::GetLyrics { browse_id } => encode(catalog.get_lyrics(browse_id).await?),
        Command::GetHome => encode(catalog.get_home(HOME_SECTIONS).await?),
        Command::GetCharts { country } => encode(catalog.get_charts(country).await?),
        Command::GetAudioUrl { video_id, quality } => {
            let song = catalog.get_song(video_id).await?;
            encode(select_audio_format(&song, Quality::from_arg(quality))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use std::sync::Mutex;
    use supersonic_core::catalog::CatalogResult;
    use supersonic_core::models::{
        CatalogItem, ChartSection, Charts, HomeSection, ResultType, Song, StreamFormat,
        StreamingData,
    };

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[derive(Default)]
    struct FakeCatalog {
        formats: Vec<StreamFormat>,
        charts_fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn song_item(id: &str) -> CatalogItem {
        CatalogItem {
            result_type: Some(ResultType::Song),
            title: id.to_uppercase(),
            video_id: Some(id.into()),
            ..CatalogItem::default()
        }
    }

    fn audio(mime: &str, bitrate: u64, url: Option<&str>) -> StreamFormat {
        StreamFormat {
            mime_type: Some(mime.into()),
            url: url.map(str::to_owned),
            bitrate: Some(bitrate),
            extra: Map::new(),
        }
    }

    #[async_trait::async_trait]
    impl MusicCatalog for FakeCatalog {
        fn id(&self) -> &str {
            "fake"
        }

        async fn search(
            &self,
            query: &str,
            filter: SearchFilter,
            limit: usize,
        ) -> CatalogResult<Vec<CatalogItem>> {
            self.record(format!("search:{query}:{filter}:{limit}"));
            Ok(vec![song_item("s1"), song_item("s2")])
        }

        async fn get_charts(&self, country: &str) -> CatalogResult<Charts> {
            self.record(format!("charts:{country}"));
            if self.charts_fail {
                return Err(CatalogError::Network {
                    message: "connection reset".into(),
                });
            }
            Ok(Charts {
                videos: Some(ChartSection {
                    playlist: None,
                    items: vec![song_item("c1"), song_item("c2"), song_item("c3")],
                }),
                ..Charts::default()
            })
        }

        async fn get_song(&self, video_id: &str) -> CatalogResult<Song> {
            self.record(format!("song:{video_id}"));
            if self.formats.is_empty() {
                return Ok(Song::default());
            }
            let mut extra = Map::new();
            extra.insert("videoDetails".into(), json!({ "videoId": video_id }));
            Ok(Song {
                streaming_data: Some(StreamingData {
                    adaptive_formats: self.formats.clone(),
                    extra: Map::new(),
                }),
                extra,
            })
        }

        async fn get_home(&self, limit: usize) -> CatalogResult<Vec<HomeSection>> {
            self.record(format!("home:{limit}"));
            Ok(vec![HomeSection {
                title: "Quick picks".into(),
                contents: vec![song_item("h1")],
            }])
        }
    }

    #[test]
    fn missing_positionals_take_defaults() {
        assert_eq!(
            Command::from_args("search", &[]).unwrap(),
            Command::Search {
                query: String::new(),
                filter: "songs".into(),
                limit: 20
            }
        );
        assert_eq!(
            Command::from_args("get_trending", &[]).unwrap(),
            Command::GetTrending { limit: 25 }
        );
        assert_eq!(
            Command::from_args("get_playlist", &args(&["PL1"])).unwrap(),
            Command::GetPlaylist {
                playlist_id: "PL1".into(),
                limit: 50
            }
        );
        assert_eq!(
            Command::from_args("get_watch_playlist", &args(&["v1"])).unwrap(),
            Command::GetWatchPlaylist {
                video_id: "v1".into(),
                limit: 25
            }
        );
        assert_eq!(
            Command::from_args("get_charts", &[]).unwrap(),
            Command::GetCharts {
                country: "IN".into()
            }
        );
        assert_eq!(
            Command::from_args("get_audio_url", &args(&["v1"])).unwrap(),
            Command::GetAudioUrl {
                video_id: "v1".into(),
                quality: "high".into()
            }
        );
        assert_eq!(
            Command::from_args("get_song", &[]).unwrap(),
            Command::GetSong {
                video_id: String::new()
            }
        );
    }

    #[test]
    fn extra_positionals_are_ignored() {
        let command = Command::from_args("get_lyrics", &args(&["MPLY1", "extra"])).unwrap();
        assert_eq!(
            command,
            Command::GetLyrics {
                browse_id: "MPLY1".into()
            }
        );
    }

    #[test]
    fn bad_limit_is_reported() {
        let err = Command::from_args("search", &args(&["q", "songs", "ten"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid limit 'ten': expected a non-negative integer"
        );
        assert!(Command::from_args("get_trending", &args(&["-3"])).is_err());
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = Command::from_args("frobnicate", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: frobnicate");
        assert_eq!(err.has_formats(), None);
    }

    #[tokio::test]
    async fn search_parses_filter_and_passes_limit() {
        let catalog = FakeCatalog::default();
        let command = Command::from_args("search", &args(&["kesariya", "songs", "5"])).unwrap();
        let value = execute(&command, &catalog, &TrendingConfig::default())
            .await
            .unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["videoId"], "s1");
        assert_eq!(catalog.calls(), vec!["search:kesariya:songs:5"]);
    }

    #[tokio::test]
    async fn search_with_unknown_filter_fails_before_calling_catalog() {
        let catalog = FakeCatalog::default();
        let command = Command::from_args("search", &args(&["q", "podcasts"])).unwrap();
        let err = execute(&command, &catalog, &TrendingConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid filter provided."));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn audio_url_picks_by_quality() {
        let catalog = FakeCatalog {
            formats: vec![
                audio("audio/mp4; codecs=\"mp4a.40.2\"", 128_000, Some("https://a/128")),
                audio("audio/webm; codecs=\"opus\"", 256_000, Some("https://a/256")),
                audio("audio/mp4; codecs=\"mp4a.40.5\"", 64_000, Some("https://a/64")),
            ],
            ..FakeCatalog::default()
        };
        let config = TrendingConfig::default();

        let high = execute(
            &Command::from_args("get_audio_url", &args(&["v1"])).unwrap(),
            &catalog,
            &config,
        )
        .await
        .unwrap();
        assert_eq!(
            high,
            json!({
                "url": "https://a/256",
                "mimeType": "audio/webm; codecs=\"opus\"",
                "bitrate": 256000,
                "format": "webm",
                "source": "ytmusic"
            })
        );

        let low = execute(
            &Command::from_args("get_audio_url", &args(&["v1", "low"])).unwrap(),
            &catalog,
            &config,
        )
        .await
        .unwrap();
        assert_eq!(low["bitrate"], 64000);
        assert_eq!(low["format"], "m4a");
    }

    #[tokio::test]
    async fn audio_url_reports_ciphered_streams() {
        let catalog = FakeCatalog {
            formats: vec![audio("audio/webm; codecs=\"opus\"", 160_000, None)],
            ..FakeCatalog::default()
        };
        let command = Command::from_args("get_audio_url", &args(&["v1"])).unwrap();
        let err = execute(&command, &catalog, &TrendingConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Audio streams require signature decoding");
        assert_eq!(err.has_formats(), Some(true));
    }

    #[tokio::test]
    async fn audio_url_for_empty_record_is_not_found() {
        let catalog = FakeCatalog::default();
        let command = Command::from_args("get_audio_url", &args(&["missing"])).unwrap();
        let err = execute(&command, &catalog, &TrendingConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Song not found");
    }

    #[tokio::test]
    async fn trending_uses_configured_country_and_limit() {
        let catalog = FakeCatalog::default();
        let config = TrendingConfig {
            country: "US".into(),
            ..TrendingConfig::default()
        };
        let command = Command::from_args("get_trending", &args(&["2"])).unwrap();
        let value = execute(&command, &catalog, &config).await.unwrap();
        assert_eq!(value["source"], "charts");
        assert_eq!(value["trending"].as_array().map(Vec::len), Some(2));
        assert_eq!(catalog.calls(), vec!["charts:US"]);
    }

    #[tokio::test]
    async fn trending_survives_chart_failure() {
        let catalog = FakeCatalog {
            charts_fail: true,
            ..FakeCatalog::default()
        };
        let config = TrendingConfig::default();
        let command = Command::from_args("get_trending", &[]).unwrap();
        let value = execute(&command, &catalog, &config).await.unwrap();
        assert_eq!(value["source"], "search_fallback");
        assert_eq!(
            catalog.calls(),
            vec![
                format!("charts:{}", config.country),
                format!("search:{}:songs:25", config.fallback_query)
            ]
        );
    }

    #[tokio::test]
    async fn home_requests_ten_sections() {
        let catalog = FakeCatalog::default();
        let value = execute(&Command::GetHome, &catalog, &TrendingConfig::default())
            .await
            .unwrap();
        assert_eq!(value[0]["title"], "Quick picks");
        assert_eq!(catalog.calls(), vec!["home:10"]);
    }

    #[tokio::test]
    async fn unsupported_operations_surface_catalog_message() {
        let catalog = FakeCatalog::default();
        let command = Command::from_args("get_album", &args(&["MPRE1"])).unwrap();
        let err = execute(&command, &catalog, &TrendingConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "operation not supported: get_album");
    }
}
