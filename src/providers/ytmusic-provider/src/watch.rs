use crate::client::{shelf_continuation, InnertubeClient};
use crate::mapping::map_items;
use crate::navigation::{nav_array, nav_str, WATCH_TABS};
use serde_json::{json, Value};
use supersonic_core::catalog::{CatalogError, CatalogResult};
use supersonic_core::models::{Song, WatchPlaylist};

const QUEUE_PANEL: &str =
    "/0/tabRenderer/content/musicQueueRenderer/content/playlistPanelRenderer";

pub const WATCH_TARGET_MISSING: &str =
    "You must provide either a video id, a playlist id, or both";

/// Player plumbing that is of no use to consumers of a song record.
const PLAYER_NOISE: &[&str] = &[
    "playerConfig",
    "playbackTracking",
    "adPlacements",
    "responseContext",
    "trackingParams",
    "attestation",
];

/// Fetches the player record. An empty id is sent as-is; upstream answers
/// with a record that carries no streaming data.
pub async fn song(client: &InnertubeClient, video_id: &str) -> CatalogResult<Song> {
    let video_id = video_id.trim();
    let body = json!({
        "videoId": video_id,
        "contentCheckOk": true,
        "racyCheckOk": true,
    });
    let mut response = client.post("player", body).await?;
    if let Value::Object(map) = &mut response {
        for key in PLAYER_NOISE {
            map.remove(*key);
        }
    }
    serde_json::from_value(response).map_err(|e| CatalogError::Decode {
        endpoint: "player".into(),
        message: e.to_string(),
    })
}

/// Browse id behind the watch tab at `index`, unless the tab is disabled.
fn tab_browse_id(tabs: &[Value], index: usize) -> Option<String> {
    let tab = tabs.get(index)?.get("tabRenderer")?;
    if tab.get("unselectable").is_some() {
        return None;
    }
    nav_str(tab, "/endpoint/browseEndpoint/browseId")
}

pub async fn watch_playlist(
    client: &InnertubeClient,
    video_id: &str,
    limit: usize,
) -> CatalogResult<WatchPlaylist> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(CatalogError::InvalidArgument {
            message: WATCH_TARGET_MISSING.into(),
        });
    }
    let body = json!({
        "enablePersistentPlaylistPanel": true,
        "isAudioOnly": true,
        "tunerSettingValue": "AUTOMIX_SETTING_NORMAL",
        "videoId": video_id,
        "playlistId": format!("RDAMVM{video_id}"),
        "watchEndpointMusicSupportedConfigs": {
            "watchEndpointMusicConfig": {
                "hasPersistentPlaylistPanel": true,
                "musicVideoType": "MUSIC_VIDEO_TYPE_ATV",
            }
        },
    });
    let response = client.post("next", body.clone()).await?;

    let tabs = nav_array(&response, WATCH_TABS);
    let panel = response
        .pointer(&format!("{WATCH_TABS}{QUEUE_PANEL}"))
        .ok_or_else(|| CatalogError::NotFound {
            entity: format!("watch queue for {video_id}"),
        })?;

    let mut watch = WatchPlaylist {
        tracks: map_items(nav_array(panel, "/contents"), None),
        playlist_id: nav_str(panel, "/playlistId"),
        lyrics: tab_browse_id(tabs, 1),
        related: tab_browse_id(tabs, 2),
    };

    let mut continuation = shelf_continuation(panel);
    while watch.tracks.len() < limit {
        let Some(token) = continuation.take() else {
            break;
        };
        let page = client.continuation("next", &token, &body).await?;
        let before = watch.tracks.len();
        watch.tracks.extend(map_items(&page.contents, None));
        if watch.tracks.len() == before {
            break;
        }
        continuation = page.next;
    }
    watch.tracks.truncate(limit);
    tracing::debug!(video_id, tracks = watch.tracks.len(), "watch playlist fetched");
    Ok(watch)
}
