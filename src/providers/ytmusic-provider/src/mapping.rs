use crate::navigation::{
    duration_seconds, is_duration, is_year, nav_array, nav_str, parse_thumbnails,
    BROWSE_ID, MUSIC_THUMBNAILS, MUSIC_VIDEO_TYPE, PAGE_TYPE, PLAY_BUTTON, TITLE_TEXT,
};
use serde_json::Value;
use supersonic_core::models::{CatalogItem, EntityRef, ResultType};

const SEPARATORS: &[&str] = &[" • ", " & ", ", ", " · "];

/// Maps any listing renderer the catalog uses to a [`CatalogItem`].
pub fn map_item(entry: &Value, default_type: Option<ResultType>) -> Option<CatalogItem> {
    if let Some(renderer) = entry.get("musicResponsiveListItemRenderer") {
        return map_list_item(renderer, default_type);
    }
    if let Some(renderer) = entry.get("musicTwoRowItemRenderer") {
        return map_two_row_item(renderer, default_type);
    }
    if let Some(renderer) = entry.get("playlistPanelVideoRenderer") {
        return map_panel_video(renderer);
    }
    if let Some(renderer) = entry.pointer("/playlistPanelVideoWrapperRenderer/primaryRenderer/playlistPanelVideoRenderer") {
        return map_panel_video(renderer);
    }
    None
}

pub fn map_items(entries: &[Value], default_type: Option<ResultType>) -> Vec<CatalogItem> {
    entries
        .iter()
        .filter_map(|entry| map_item(entry, default_type))
        .collect()
}

fn flex_column_runs(renderer: &Value, index: usize) -> &[Value] {
    nav_array(
        renderer,
        &format!("/flexColumns/{index}/musicResponsiveListItemFlexColumnRenderer/text/runs"),
    )
}

/// Row in a shelf (search results, album and playlist tracks, artist songs).
pub fn map_list_item(renderer: &Value, default_type: Option<ResultType>) -> Option<CatalogItem> {
    let title_runs = flex_column_runs(renderer, 0);
    let title = title_runs.first()?.get("text")?.as_str()?.to_string();

    let mut item = CatalogItem {
        title,
        video_id: nav_str(renderer, "/playlistItemData/videoId")
            .or_else(|| nav_str(renderer, &format!("{PLAY_BUTTON}/watchEndpoint/videoId")))
            .or_else(|| {
                title_runs
                    .first()
                    .and_then(|run| nav_str(run, "/navigationEndpoint/watchEndpoint/videoId"))
            }),
        browse_id: nav_str(renderer, BROWSE_ID),
        thumbnails: parse_thumbnails(renderer, MUSIC_THUMBNAILS),
        is_explicit: has_explicit_badge(renderer),
        ..CatalogItem::default()
    };

    let columns = renderer
        .get("flexColumns")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let subtitle_runs: Vec<&Value> = (1..columns)
        .flat_map(|index| flex_column_runs(renderer, index))
        .collect();
    item.subtitle = subtitle_text(&subtitle_runs);
    apply_subtitle_runs(&mut item, &subtitle_runs, default_type.is_none());

    if let Some(fixed) = nav_str(
        renderer,
        "/fixedColumns/0/musicResponsiveListItemFixedColumnRenderer/text/runs/0/text",
    ) {
        if is_duration(&fixed) {
            item.duration = Some(fixed);
        }
    }

    let video_type = nav_str(renderer, &format!("{PLAY_BUTTON}/watchEndpoint{MUSIC_VIDEO_TYPE}"));
    item.playlist_id = nav_str(
        renderer,
        &format!("{PLAY_BUTTON}/watchPlaylistEndpoint/playlistId"),
    )
    .or_else(|| playlist_from_browse_id(item.browse_id.as_deref()));
    finish(&mut item, default_type, video_type.as_deref());
    Some(item)
}

/// Card in a carousel (home shelves, charts, artist albums/singles/videos).
pub fn map_two_row_item(renderer: &Value, default_type: Option<ResultType>) -> Option<CatalogItem> {
    let title = nav_str(renderer, TITLE_TEXT)?;
    let mut item = CatalogItem {
        title,
        video_id: nav_str(renderer, "/navigationEndpoint/watchEndpoint/videoId"),
        browse_id: nav_str(renderer, BROWSE_ID)
            .or_else(|| nav_str(renderer, "/title/runs/0/navigationEndpoint/browseEndpoint/browseId")),
        thumbnails: parse_thumbnails(
            renderer,
            "/thumbnailRenderer/musicThumbnailRenderer/thumbnail/thumbnails",
        ),
        is_explicit: renderer
            .get("subtitleBadges")
            .is_some_and(|badges| badges_contain_explicit(badges)),
        ..CatalogItem::default()
    };

    let subtitle_runs: Vec<&Value> = nav_array(renderer, "/subtitle/runs").iter().collect();
    item.subtitle = subtitle_text(&subtitle_runs);
    apply_subtitle_runs(&mut item, &subtitle_runs, default_type.is_none());

    item.playlist_id = nav_str(renderer, "/navigationEndpoint/watchEndpoint/playlistId")
        .or_else(|| {
            nav_str(
                renderer,
                "/thumbnailOverlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchPlaylistEndpoint/playlistId",
            )
        })
        .or_else(|| playlist_from_browse_id(item.browse_id.as_deref()));
    let video_type = nav_str(renderer, &format!("/navigationEndpoint/watchEndpoint{MUSIC_VIDEO_TYPE}"));
    finish(&mut item, default_type, video_type.as_deref());
    Some(item)
}

/// Entry of a watch (autoplay) queue.
pub fn map_panel_video(renderer: &Value) -> Option<CatalogItem> {
    let video_id = nav_str(renderer, "/videoId")?;
    let mut item = CatalogItem {
        title: nav_str(renderer, TITLE_TEXT).unwrap_or_default(),
        video_id: Some(video_id),
        thumbnails: parse_thumbnails(renderer, "/thumbnail/thumbnails"),
        duration: nav_str(renderer, "/lengthText/runs/0/text"),
        is_explicit: renderer
            .get("badges")
            .is_some_and(|badges| badges_contain_explicit(badges)),
        ..CatalogItem::default()
    };
    let byline: Vec<&Value> = nav_array(renderer, "/longBylineText/runs").iter().collect();
    item.subtitle = subtitle_text(&byline);
    apply_subtitle_runs(&mut item, &byline, false);

    let video_type = nav_str(renderer, &format!("/navigationEndpoint/watchEndpoint{MUSIC_VIDEO_TYPE}"));
    finish(&mut item, None, video_type.as_deref());
    Some(item)
}

fn subtitle_text(runs: &[&Value]) -> Option<String> {
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Sorts subtitle runs into artists, album, duration, views and year.
///
/// A leading plain-text label such as "Song" or "Album" is never read as an
/// artist; when `detect_type` is set it also decides the result type.
fn apply_subtitle_runs(item: &mut CatalogItem, runs: &[&Value], detect_type: bool) {
    for (index, run) in runs.iter().enumerate() {
        let Some(text) = run.get("text").and_then(Value::as_str) else {
            continue;
        };
        if SEPARATORS.contains(&text) || text.trim().is_empty() {
            continue;
        }

        if let Some(browse_id) = nav_str(run, BROWSE_ID) {
            let page_type = nav_str(run, PAGE_TYPE).unwrap_or_default();
            if page_type.ends_with("ALBUM") || browse_id.starts_with("MPRE") {
                item.album = Some(EntityRef::new(text, Some(browse_id)));
            } else if page_type.ends_with("ARTIST")
                || page_type.ends_with("USER_CHANNEL")
                || browse_id.starts_with("UC")
            {
                item.artists.push(EntityRef::new(text, Some(browse_id)));
            }
            continue;
        }

        if is_duration(text) {
            item.duration = Some(text.to_string());
        } else if text.ends_with(" views") || text.ends_with(" plays") {
            item.views = Some(text.trim_end_matches(" views").trim_end_matches(" plays").to_string());
        } else if is_year(text) {
            item.year = Some(text.to_string());
        } else if index == 0 && type_label(text).is_some() {
            if detect_type {
                item.result_type = type_label(text);
            }
        } else if item.artists.is_empty() && item.album.is_none() {
            item.artists.push(EntityRef::new(text, None));
        }
    }
}

fn type_label(text: &str) -> Option<ResultType> {
    match text {
        "Song" => Some(ResultType::Song),
        "Video" => Some(ResultType::Video),
        "Album" | "Single" | "EP" => Some(ResultType::Album),
        "Artist" => Some(ResultType::Artist),
        "Playlist" => Some(ResultType::Playlist),
        "Podcast" => Some(ResultType::Podcast),
        "Episode" => Some(ResultType::Episode),
        "Profile" => Some(ResultType::Profile),
        _ => None,
    }
}

fn finish(item: &mut CatalogItem, default_type: Option<ResultType>, video_type: Option<&str>) {
    item.duration_seconds = item.duration.as_deref().and_then(duration_seconds);
    if item.result_type.is_some() {
        return;
    }
    item.result_type = default_type.or_else(|| infer_type(item, video_type));
}

fn infer_type(item: &CatalogItem, video_type: Option<&str>) -> Option<ResultType> {
    if item.video_id.is_some() {
        return Some(match video_type {
            Some("MUSIC_VIDEO_TYPE_ATV") => ResultType::Song,
            Some(_) => ResultType::Video,
            None if item.album.is_some() => ResultType::Song,
            None => ResultType::Video,
        });
    }
    let browse_id = item.browse_id.as_deref()?;
    if browse_id.starts_with("MPRE") {
        Some(ResultType::Album)
    } else if browse_id.starts_with("UC") {
        Some(ResultType::Artist)
    } else if browse_id.starts_with("VL") || browse_id.starts_with("PL") {
        Some(ResultType::Playlist)
    } else {
        None
    }
}

fn playlist_from_browse_id(browse_id: Option<&str>) -> Option<String> {
    browse_id
        .and_then(|id| id.strip_prefix("VL"))
        .map(str::to_owned)
}

fn has_explicit_badge(renderer: &Value) -> bool {
    renderer
        .get("badges")
        .is_some_and(|badges| badges_contain_explicit(badges))
}

fn badges_contain_explicit(badges: &Value) -> bool {
    badges.as_array().is_some_and(|badges| {
        badges.iter().any(|badge| {
            nav_str(badge, "/musicInlineBadgeRenderer/icon/iconType").as_deref()
                == Some("MUSIC_EXPLICIT_BADGE")
        })
    })
}

/// Artist references from a run list, e.g. an album header strapline.
pub fn map_artist_runs(runs: &[Value]) -> Vec<EntityRef> {
    runs.iter()
        .filter_map(|run| {
            let text = run.get("text")?.as_str()?;
            if SEPARATORS.contains(&text) {
                return None;
            }
            Some(EntityRef::new(text, nav_str(run, BROWSE_ID)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song_row() -> Value {
        json!({"musicResponsiveListItemRenderer": {
            "thumbnail": {"musicThumbnailRenderer": {"thumbnail": {"thumbnails": [
                {"url": "https://i/60", "width": 60, "height": 60}
            ]}}},
            "overlay": {"musicItemThumbnailOverlayRenderer": {"content": {"musicPlayButtonRenderer": {
                "playNavigationEndpoint": {"watchEndpoint": {
                    "videoId": "vid-1",
                    "watchEndpointMusicSupportedConfigs": {"watchEndpointMusicConfig": {"musicVideoType": "MUSIC_VIDEO_TYPE_ATV"}}
                }}
            }}}},
            "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": "Kesariya"}]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                    {"text": "Arijit Singh", "navigationEndpoint": {"browseEndpoint": {"browseId": "UCartist"}}},
                    {"text": " • "},
                    {"text": "Brahmastra", "navigationEndpoint": {"browseEndpoint": {"browseId": "MPREalbum"}}},
                    {"text": " • "},
                    {"text": "4:28"}
                ]}}}
            ],
            "badges": [{"musicInlineBadgeRenderer": {"icon": {"iconType": "MUSIC_EXPLICIT_BADGE"}}}]
        }})
    }

    #[test]
    fn list_item_song() {
        let item = map_item(&song_row(), Some(ResultType::Song)).unwrap();
        assert_eq!(item.title, "Kesariya");
        assert_eq!(item.video_id.as_deref(), Some("vid-1"));
        assert_eq!(item.artists, vec![EntityRef::new("Arijit Singh", Some("UCartist".into()))]);
        assert_eq!(item.album.as_ref().map(|a| a.name.as_str()), Some("Brahmastra"));
        assert_eq!(item.duration.as_deref(), Some("4:28"));
        assert_eq!(item.duration_seconds, Some(268));
        assert_eq!(item.result_type, Some(ResultType::Song));
        assert!(item.is_explicit);
        assert_eq!(item.thumbnails.len(), 1);
    }

    #[test]
    fn list_item_infers_song_from_video_type() {
        let item = map_item(&song_row(), None).unwrap();
        assert_eq!(item.result_type, Some(ResultType::Song));
    }

    #[test]
    fn leading_type_label_is_not_an_artist() {
        let row = json!({"musicResponsiveListItemRenderer": {
            "navigationEndpoint": {"browseEndpoint": {"browseId": "MPRExyz"}},
            "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": "Some Album"}]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                    {"text": "Album"}, {"text": " • "}, {"text": "Band"}, {"text": " • "}, {"text": "2019"}
                ]}}}
            ]
        }});
        let item = map_item(&row, None).unwrap();
        assert_eq!(item.result_type, Some(ResultType::Album));
        assert_eq!(item.artists, vec![EntityRef::new("Band", None)]);
        assert_eq!(item.year.as_deref(), Some("2019"));
    }

    #[test]
    fn two_row_playlist_card() {
        let card = json!({"musicTwoRowItemRenderer": {
            "title": {"runs": [{"text": "Top 100 Songs India"}]},
            "subtitle": {"runs": [{"text": "Playlist"}, {"text": " • "}, {"text": "YouTube Music"}]},
            "navigationEndpoint": {"browseEndpoint": {"browseId": "VLPL4fGSI1pDJn"}},
            "thumbnailRenderer": {"musicThumbnailRenderer": {"thumbnail": {"thumbnails": [{"url": "https://i/226"}]}}}
        }});
        let item = map_item(&card, None).unwrap();
        assert_eq!(item.result_type, Some(ResultType::Playlist));
        assert_eq!(item.playlist_id.as_deref(), Some("PL4fGSI1pDJn"));
        assert_eq!(item.subtitle.as_deref(), Some("Playlist • YouTube Music"));
    }

    #[test]
    fn panel_video_reads_byline() {
        let entry = json!({"playlistPanelVideoRenderer": {
            "videoId": "vid-9",
            "title": {"runs": [{"text": "Apna Bana Le"}]},
            "lengthText": {"runs": [{"text": "4:21"}]},
            "longBylineText": {"runs": [
                {"text": "Arijit Singh", "navigationEndpoint": {"browseEndpoint": {"browseId": "UCx"}}},
                {"text": " • "},
                {"text": "12M views"},
                {"text": " • "},
                {"text": "2022"}
            ]},
            "navigationEndpoint": {"watchEndpoint": {"videoId": "vid-9",
                "watchEndpointMusicSupportedConfigs": {"watchEndpointMusicConfig": {"musicVideoType": "MUSIC_VIDEO_TYPE_OMV"}}}}
        }});
        let item = map_item(&entry, None).unwrap();
        assert_eq!(item.result_type, Some(ResultType::Video));
        assert_eq!(item.views.as_deref(), Some("12M"));
        assert_eq!(item.year.as_deref(), Some("2022"));
        assert_eq!(item.duration_seconds, Some(261));
    }

    #[test]
    fn unknown_renderers_are_skipped() {
        assert!(map_item(&json!({"messageRenderer": {}}), None).is_none());
    }
}
