//! Audio stream selection.
//!
//! Picks one direct-URL audio format out of a song's adaptive formats
//! according to a bitrate quality policy.

use crate::models::{Song, StreamFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag attached to every selection so callers know which resolver produced it.
pub const SELECTION_SOURCE: &str = "ytmusic";

const DEFAULT_BITRATE: u64 = 128_000;
const DEFAULT_MIME_TYPE: &str = "audio/mp4";

/// Requested stream quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Normal,
    #[default]
    High,
    Lossless,
}

impl Quality {
    /// Maps a command-line token to a quality. Unrecognized tokens mean `High`.
    pub fn from_arg(value: &str) -> Self {
        match value {
            "low" => Quality::Low,
            "normal" => Quality::Normal,
            "lossless" => Quality::Lossless,
            _ => Quality::High,
        }
    }
}

/// Container label derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContainer {
    M4a,
    Webm,
}

impl AudioContainer {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.contains("mp4") {
            AudioContainer::M4a
        } else {
            AudioContainer::Webm
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub url: String,
    pub mime_type: String,
    pub bitrate: u64,
    pub format: AudioContainer,
    pub source: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Song not found")]
    NotFound,
    #[error("Audio streams require signature decoding")]
    SignatureRequired,
    #[error("No audio streams available")]
    NoAudioAvailable,
}

impl SelectionError {
    /// Whether audio formats exist at all; only reported when they do.
    pub fn has_formats(&self) -> Option<bool> {
        match self {
            SelectionError::SignatureRequired => Some(true),
            SelectionError::NotFound | SelectionError::NoAudioAvailable => None,
        }
    }
}

/// Selects a playable audio stream from `song` for the requested quality.
pub fn select_audio_format(
    song: &Song,
    quality: Quality,
) -> Result<SelectionResult, SelectionError> {
    if song.is_empty() {
        return Err(SelectionError::NotFound);
    }

    let formats = song.adaptive_formats();
    let mut playable: Vec<&StreamFormat> = formats
        .iter()
        .filter(|format| format.is_audio() && format.has_direct_url())
        .collect();

    if playable.is_empty() {
        return if formats.iter().any(StreamFormat::is_audio) {
            Err(SelectionError::SignatureRequired)
        } else {
            Err(SelectionError::NoAudioAvailable)
        };
    }

    // sort_by is stable: equal bitrates keep their catalog order.
    playable.sort_by(|a, b| b.bitrate.unwrap_or(0).cmp(&a.bitrate.unwrap_or(0)));

    let index = match quality {
        Quality::Low => playable.len() - 1,
        Quality::Normal if playable.len() > 2 => playable.len() / 2,
        Quality::Normal | Quality::High | Quality::Lossless => 0,
    };
    let selected = playable[index];

    tracing::debug!(
        candidates = playable.len(),
        index,
        bitrate = selected.bitrate,
        "selected audio format"
    );

    let mime_type = selected
        .mime_type
        .clone()
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
    Ok(SelectionResult {
        url: selected.url.clone().unwrap_or_default(),
        format: AudioContainer::from_mime(selected.mime_type.as_deref().unwrap_or_default()),
        mime_type,
        bitrate: selected.bitrate.unwrap_or(DEFAULT_BITRATE),
        source: SELECTION_SOURCE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StreamingData;
    use serde_json::{json, Map, Value};

    fn audio(mime: &str, bitrate: u64, url: &str) -> StreamFormat {
        StreamFormat {
            mime_type: Some(mime.into()),
            url: Some(url.into()),
            bitrate: Some(bitrate),
            extra: Map::new(),
        }
    }

    fn song_with(formats: Vec<StreamFormat>) -> Song {
        let mut extra = Map::new();
        extra.insert("videoDetails".into(), json!({"videoId": "abc"}));
        Song {
            streaming_data: Some(StreamingData {
                adaptive_formats: formats,
                extra: Map::new(),
            }),
            extra,
        }
    }

    fn three_bitrates() -> Song {
        song_with(vec![
            audio("audio/webm; codecs=\"opus\"", 64_000, "https://a/64"),
            audio("audio/mp4; codecs=\"mp4a.40.2\"", 128_000, "https://a/128"),
            audio("audio/webm; codecs=\"opus\"", 256_000, "https://a/256"),
        ])
    }

    #[test]
    fn empty_record_is_not_found() {
        let err = select_audio_format(&Song::default(), Quality::High).unwrap_err();
        assert_eq!(err, SelectionError::NotFound);
        assert_eq!(err.has_formats(), None);
    }

    #[test]
    fn no_adaptive_formats_means_no_audio() {
        let err = select_audio_format(&song_with(Vec::new()), Quality::High).unwrap_err();
        assert_eq!(err, SelectionError::NoAudioAvailable);
        assert_eq!(err.to_string(), "No audio streams available");
    }

    #[test]
    fn record_without_streaming_data_means_no_audio() {
        let mut extra = Map::new();
        extra.insert(
            "playabilityStatus".into(),
            json!({"status": "ERROR", "reason": "Video unavailable"}),
        );
        let song = Song {
            streaming_data: None,
            extra,
        };
        assert_eq!(
            select_audio_format(&song, Quality::High).unwrap_err(),
            SelectionError::NoAudioAvailable
        );
    }

    #[test]
    fn video_only_formats_mean_no_audio() {
        let song = song_with(vec![audio("video/mp4; codecs=\"avc1\"", 900_000, "https://v")]);
        assert_eq!(
            select_audio_format(&song, Quality::High).unwrap_err(),
            SelectionError::NoAudioAvailable
        );
    }

    #[test]
    fn ciphered_audio_requires_signature() {
        let mut ciphered = audio("audio/webm; codecs=\"opus\"", 160_000, "");
        ciphered.url = None;
        ciphered
            .extra
            .insert("signatureCipher".into(), Value::from("s=xyz&url=https%3A%2F%2Fa"));
        let err = select_audio_format(&song_with(vec![ciphered]), Quality::High).unwrap_err();
        assert_eq!(err, SelectionError::SignatureRequired);
        assert_eq!(err.has_formats(), Some(true));
        assert_eq!(err.to_string(), "Audio streams require signature decoding");
    }

    #[test]
    fn high_picks_highest_bitrate() {
        let selected = select_audio_format(&three_bitrates(), Quality::High).unwrap();
        assert_eq!(selected.bitrate, 256_000);
        assert_eq!(selected.url, "https://a/256");
        assert_eq!(selected.format, AudioContainer::Webm);
        assert_eq!(selected.source, SELECTION_SOURCE);
    }

    #[test]
    fn lossless_and_unknown_behave_like_high() {
        for quality in [Quality::Lossless, Quality::from_arg("ultra")] {
            let selected = select_audio_format(&three_bitrates(), quality).unwrap();
            assert_eq!(selected.bitrate, 256_000);
        }
    }

    #[test]
    fn low_picks_lowest_bitrate() {
        let selected = select_audio_format(&three_bitrates(), Quality::Low).unwrap();
        assert_eq!(selected.bitrate, 64_000);
    }

    #[test]
    fn normal_picks_middle_when_more_than_two() {
        let selected = select_audio_format(&three_bitrates(), Quality::Normal).unwrap();
        assert_eq!(selected.bitrate, 128_000);
        assert_eq!(selected.format, AudioContainer::M4a);
    }

    #[test]
    fn normal_with_two_picks_highest() {
        let song = song_with(vec![
            audio("audio/webm", 64_000, "https://a/64"),
            audio("audio/webm", 256_000, "https://a/256"),
        ]);
        let selected = select_audio_format(&song, Quality::Normal).unwrap();
        assert_eq!(selected.bitrate, 256_000);
    }

    #[test]
    fn equal_bitrates_keep_catalog_order() {
        let song = song_with(vec![
            audio("audio/mp4", 128_000, "https://first"),
            audio("audio/webm", 128_000, "https://second"),
        ]);
        assert_eq!(
            select_audio_format(&song, Quality::High).unwrap().url,
            "https://first"
        );
        assert_eq!(
            select_audio_format(&song, Quality::Low).unwrap().url,
            "https://second"
        );
    }

    #[test]
    fn ciphered_entries_are_skipped_when_direct_ones_exist() {
        let mut ciphered = audio("audio/webm", 320_000, "");
        ciphered.url = None;
        let song = song_with(vec![ciphered, audio("audio/mp4", 96_000, "https://direct")]);
        let selected = select_audio_format(&song, Quality::High).unwrap();
        assert_eq!(selected.url, "https://direct");
    }

    #[test]
    fn missing_bitrate_defaults_on_output() {
        let mut format = audio("audio/mp4", 0, "https://a");
        format.bitrate = None;
        let selected = select_audio_format(&song_with(vec![format]), Quality::High).unwrap();
        assert_eq!(selected.bitrate, DEFAULT_BITRATE);
    }

    #[test]
    fn result_serializes_with_catalog_names() {
        let selected = select_audio_format(&three_bitrates(), Quality::Normal).unwrap();
        let value = serde_json::to_value(&selected).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "https://a/128",
                "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
                "bitrate": 128000,
                "format": "m4a",
                "source": "ytmusic"
            })
        );
    }

    #[test]
    fn quality_tokens() {
        assert_eq!(Quality::from_arg("low"), Quality::Low);
        assert_eq!(Quality::from_arg("normal"), Quality::Normal);
        assert_eq!(Quality::from_arg("high"), Quality::High);
        assert_eq!(Quality::from_arg("LOW"), Quality::High);
    }
}
