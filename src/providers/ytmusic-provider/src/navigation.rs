//! JSON-pointer helpers for walking innertube responses.

use serde_json::Value;
use supersonic_core::models::Thumbnail;

pub const SINGLE_COLUMN_SECTIONS: &str =
    "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";
pub const SINGLE_COLUMN_CONTINUATION: &str =
    "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/continuations/0/nextContinuationData/continuation";
pub const TWO_COLUMN_HEADER: &str =
    "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0";
pub const TWO_COLUMN_SECONDARY: &str =
    "/contents/twoColumnBrowseResultsRenderer/secondaryContents/sectionListRenderer/contents/0";
pub const SEARCH_SECTIONS: &str =
    "/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";
pub const WATCH_TABS: &str =
    "/contents/singleColumnMusicWatchNextResultsRenderer/tabbedRenderer/watchNextTabbedResultsRenderer/tabs";

pub const TITLE_TEXT: &str = "/title/runs/0/text";
pub const BROWSE_ID: &str = "/navigationEndpoint/browseEndpoint/browseId";
pub const TITLE_BROWSE_ID: &str = "/title/runs/0/navigationEndpoint/browseEndpoint/browseId";
pub const PAGE_TYPE: &str =
    "/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs/browseEndpointContextMusicConfig/pageType";
pub const MUSIC_THUMBNAILS: &str = "/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails";
pub const PLAY_BUTTON: &str =
    "/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint";
pub const CAROUSEL_TITLE: &str = "/header/musicCarouselShelfBasicHeaderRenderer/title/runs/0";
pub const NEXT_CONTINUATION: &str = "/continuations/0/nextContinuationData/continuation";
pub const RADIO_CONTINUATION: &str = "/continuations/0/nextRadioContinuationData/continuation";
pub const ITEM_CONTINUATION: &str =
    "/continuationItemRenderer/continuationEndpoint/continuationCommand/token";
pub const MUSIC_VIDEO_TYPE: &str =
    "/watchEndpointMusicSupportedConfigs/watchEndpointMusicConfig/musicVideoType";

pub fn nav_str(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

pub fn nav_array<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Concatenates the `text` of every run in a `{runs: [...]}` object.
pub fn joined_runs(value: Option<&Value>) -> Option<String> {
    let runs = value?.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

pub fn parse_thumbnails(value: &Value, pointer: &str) -> Vec<Thumbnail> {
    nav_array(value, pointer)
        .iter()
        .filter_map(|thumb| {
            let url = thumb.get("url")?.as_str()?.to_string();
            Some(Thumbnail {
                url,
                width: thumb
                    .get("width")
                    .and_then(Value::as_u64)
                    .and_then(|w| u32::try_from(w).ok()),
                height: thumb
                    .get("height")
                    .and_then(Value::as_u64)
                    .and_then(|h| u32::try_from(h).ok()),
            })
        })
        .collect()
}

/// True for `m:ss`, `mm:ss` and `h:mm:ss` style durations.
pub fn is_duration(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

pub fn duration_seconds(text: &str) -> Option<u64> {
    if !is_duration(text) {
        return None;
    }
    text.split(':')
        .try_fold(0u64, |total, part| {
            total.checked_mul(60)?.checked_add(part.parse::<u64>().ok()?)
        })
}

pub fn is_year(text: &str) -> bool {
    text.len() == 4 && text.chars().all(|c| c.is_ascii_digit())
}

/// Leading integer of texts like "12 songs" or "1,204 tracks".
pub fn leading_count(text: &str) -> Option<u32> {
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}
