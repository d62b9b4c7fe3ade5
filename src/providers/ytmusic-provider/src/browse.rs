use crate::client::{shelf_continuation, InnertubeClient};
use crate::mapping::{map_artist_runs, map_items};
use crate::navigation::{
    is_year, joined_runs, leading_count, nav_array, nav_str, parse_thumbnails,
    CAROUSEL_TITLE, MUSIC_THUMBNAILS, SINGLE_COLUMN_CONTINUATION, SINGLE_COLUMN_SECTIONS,
    TITLE_BROWSE_ID, TITLE_TEXT, TWO_COLUMN_HEADER, TWO_COLUMN_SECONDARY,
};
use serde_json::{json, Value};
use supersonic_core::catalog::{CatalogError, CatalogResult};
use supersonic_core::models::{
    Album, Artist, ArtistShelf, ChartCountries, ChartSection, Charts, EntityRef, HomeSection,
    Lyrics, Playlist, ResultType,
};

pub const LYRICS_MISSING: &str = "Invalid browseId provided. This song might not have lyrics.";

const CHART_COUNTRY: &str = "/0/musicShelfRenderer/subheaders/0/musicSideAlignedItemRenderer/startItems/0/musicSortFilterButtonRenderer/title/runs/0/text";
const CHART_COUNTRY_OPTIONS: &str = "/frameworkUpdates/entityBatchUpdate/mutations";

async fn browse(client: &InnertubeClient, body: &Value) -> CatalogResult<Value> {
    client.post("browse", body.clone()).await
}

fn carousel_title(carousel: &Value) -> Option<String> {
    nav_str(carousel, &format!("{CAROUSEL_TITLE}/text"))
}

fn carousel_browse(carousel: &Value, field: &str) -> Option<String> {
    nav_str(
        carousel,
        &format!("{CAROUSEL_TITLE}/navigationEndpoint/browseEndpoint/{field}"),
    )
}

/// Carousel shelves of a browse page, regular and immersive.
fn carousel_of(section: &Value) -> Option<&Value> {
    section
        .get("musicCarouselShelfRenderer")
        .or_else(|| section.get("musicImmersiveCarouselShelfRenderer"))
}

pub async fn charts(client: &InnertubeClient, country: &str) -> CatalogResult<Charts> {
    let body = json!({
        "browseId": "FEmusic_charts",
        "formData": { "selectedValues": [country] },
    });
    let response = browse(client, &body).await?;
    let sections = nav_array(&response, SINGLE_COLUMN_SECTIONS);

    let mut charts = Charts {
        countries: ChartCountries {
            selected: nav_str(&response, &format!("{SINGLE_COLUMN_SECTIONS}{CHART_COUNTRY}")),
            options: nav_array(&response, CHART_COUNTRY_OPTIONS)
                .iter()
                .filter_map(|m| nav_str(m, "/payload/musicFormBooleanChoice/opaqueToken"))
                .collect(),
        },
        ..Charts::default()
    };

    for carousel in sections.iter().filter_map(carousel_of) {
        let title = carousel_title(carousel).unwrap_or_default().to_lowercase();
        let (slot, default_type) = if title.contains("video") {
            (&mut charts.videos, None)
        } else if title.contains("trending") {
            (&mut charts.trending, None)
        } else if title.contains("artist") {
            (&mut charts.artists, Some(ResultType::Artist))
        } else if title.contains("genre") {
            (&mut charts.genres, Some(ResultType::Playlist))
        } else {
            tracing::debug!(%title, "skipping unrecognised chart shelf");
            continue;
        };
        if slot.is_some() {
            continue;
        }
        *slot = Some(ChartSection {
            playlist: carousel_browse(carousel, "browseId")
                .map(|id| id.strip_prefix("VL").map(str::to_owned).unwrap_or(id)),
            items: map_items(nav_array(carousel, "/contents"), default_type),
        });
    }
    Ok(charts)
}

pub async fn artist(client: &InnertubeClient, channel_id: &str) -> CatalogResult<Artist> {
    let channel_id = channel_id.trim().to_string();
    let channel_id = channel_id
        .strip_prefix("MPLA")
        .map(str::to_owned)
        .unwrap_or(channel_id);
    let response = browse(client, &json!({ "browseId": channel_id })).await?;

    let header = response
        .pointer("/header/musicImmersiveHeaderRenderer")
        .or_else(|| response.pointer("/header/musicVisualHeaderRenderer"))
        .ok_or_else(|| CatalogError::NotFound {
            entity: format!("artist {channel_id}"),
        })?;

    let subscribe = "/subscriptionButton/subscribeButtonRenderer";
    let mut artist = Artist {
        name: nav_str(header, TITLE_TEXT).unwrap_or_default(),
        description: joined_runs(header.get("description")),
        channel_id: nav_str(header, &format!("{subscribe}/channelId")).or(Some(channel_id)),
        subscribers: nav_str(
            header,
            &format!("{subscribe}/subscriberCountText/runs/0/text"),
        ),
        thumbnails: parse_thumbnails(header, MUSIC_THUMBNAILS),
        ..Artist::default()
    };
    if artist.thumbnails.is_empty() {
        artist.thumbnails = parse_thumbnails(header, "/foregroundThumbnail/musicThumbnailRenderer/thumbnail/thumbnails");
    }

    for section in nav_array(&response, SINGLE_COLUMN_SECTIONS) {
        if let Some(shelf) = section.get("musicShelfRenderer") {
            if artist.songs.is_none() {
                artist.songs = Some(ArtistShelf {
                    browse_id: nav_str(shelf, TITLE_BROWSE_ID),
                    params: None,
                    results: map_items(nav_array(shelf, "/contents"), Some(ResultType::Song)),
                });
            }
        } else if let Some(shelf) = section.get("musicDescriptionShelfRenderer") {
            artist.description = joined_runs(shelf.get("description")).or(artist.description);
            artist.views = joined_runs(shelf.get("subheader"));
        } else if let Some(carousel) = carousel_of(section) {
            let title = carousel_title(carousel).unwrap_or_default().to_lowercase();
            let (slot, default_type) = match title.as_str() {
                "albums" => (&mut artist.albums, Some(ResultType::Album)),
                "singles" | "singles & eps" => (&mut artist.singles, Some(ResultType::Album)),
                "videos" => (&mut artist.videos, Some(ResultType::Video)),
                t if t.contains("playlist") => (&mut artist.playlists, Some(ResultType::Playlist)),
                "fans might also like" | "related" => (&mut artist.related, Some(ResultType::Artist)),
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(ArtistShelf {
                    browse_id: carousel_browse(carousel, "browseId"),
                    params: carousel_browse(carousel, "params"),
                    results: map_items(nav_array(carousel, "/contents"), default_type),
                });
            }
        }
    }
    Ok(artist)
}

pub async fn album(client: &InnertubeClient, browse_id: &str) -> CatalogResult<Album> {
    let browse_id = browse_id.trim().to_string();
    let response = browse(client, &json!({ "browseId": browse_id })).await?;

    let (header, tracks, two_column) = match response
        .pointer(&format!("{TWO_COLUMN_HEADER}/musicResponsiveHeaderRenderer"))
    {
        Some(header) => (
            header,
            nav_array(&response, &format!("{TWO_COLUMN_SECONDARY}/musicShelfRenderer/contents")),
            true,
        ),
        None => (
            response
                .pointer("/header/musicDetailHeaderRenderer")
                .ok_or_else(|| CatalogError::NotFound {
                    entity: format!("album {browse_id}"),
                })?,
            nav_array(
                &response,
                &format!("{SINGLE_COLUMN_SECTIONS}/0/musicShelfRenderer/contents"),
            ),
            false,
        ),
    };

    let title = nav_str(header, TITLE_TEXT).ok_or_else(|| CatalogError::NotFound {
        entity: format!("album {browse_id}"),
    })?;
    let subtitle = nav_array(header, "/subtitle/runs");
    let artists = if two_column {
        map_artist_runs(nav_array(header, "/straplineTextOne/runs"))
    } else {
        map_artist_runs(subtitle)
            .into_iter()
            .filter(|artist| artist.id.is_some())
            .collect()
    };
    let description = if two_column {
        joined_runs(header.pointer("/description/musicDescriptionShelfRenderer/description"))
    } else {
        joined_runs(header.get("description"))
    };
    let thumbnails = if two_column {
        parse_thumbnails(header, MUSIC_THUMBNAILS)
    } else {
        parse_thumbnails(header, "/thumbnail/croppedSquareThumbnailRenderer/thumbnail/thumbnails")
    };

    let mut album = Album {
        album_type: nav_str(header, "/subtitle/runs/0/text"),
        year: run_texts(subtitle).find(|text| is_year(text)).map(str::to_owned),
        track_count: nav_str(header, "/secondSubtitle/runs/0/text")
            .as_deref()
            .and_then(leading_count),
        duration: run_texts(nav_array(header, "/secondSubtitle/runs"))
            .skip(1)
            .find(|text| text.trim() != "•")
            .map(str::to_owned),
        audio_playlist_id: audio_playlist_id(&response, header),
        tracks: map_items(tracks, Some(ResultType::Song)),
        title,
        description,
        thumbnails,
        artists,
    };

    let album_ref = EntityRef::new(album.title.clone(), Some(browse_id));
    for track in &mut album.tracks {
        track.album.get_or_insert_with(|| album_ref.clone());
        if track.artists.is_empty() {
            track.artists = album.artists.clone();
        }
    }
    Ok(album)
}

fn run_texts(runs: &[Value]) -> impl Iterator<Item = &str> {
    runs.iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
}

fn audio_playlist_id(response: &Value, header: &Value) -> Option<String> {
    let from_buttons = nav_array(header, "/buttons").iter().find_map(|button| {
        let endpoint = button.pointer("/musicPlayButtonRenderer/playNavigationEndpoint")?;
        nav_str(endpoint, "/watchPlaylistEndpoint/playlistId")
            .or_else(|| nav_str(endpoint, "/watchEndpoint/playlistId"))
    });
    from_buttons.or_else(|| {
        let canonical = nav_str(response, "/microformat/microformatDataRenderer/urlCanonical")?;
        let (_, list) = canonical.split_once("list=")?;
        Some(list.split('&').next().unwrap_or(list).to_string())
    })
}

pub async fn playlist(
    client: &InnertubeClient,
    playlist_id: &str,
    limit: usize,
) -> CatalogResult<Playlist> {
    let playlist_id = playlist_id.trim().to_string();
    let id = playlist_id
        .strip_prefix("VL")
        .map(str::to_owned)
        .unwrap_or(playlist_id);
    let body = json!({ "browseId": format!("VL{id}") });
    let response = browse(client, &body).await?;

    let two_column_header = response
        .pointer(&format!("{TWO_COLUMN_HEADER}/musicResponsiveHeaderRenderer"))
        .or_else(|| {
            response.pointer(&format!(
                "{TWO_COLUMN_HEADER}/musicEditablePlaylistDetailHeaderRenderer/header/musicResponsiveHeaderRenderer"
            ))
        });
    let (header, shelf) = match two_column_header {
        Some(header) => (
            Some(header),
            response.pointer(&format!("{TWO_COLUMN_SECONDARY}/musicPlaylistShelfRenderer")),
        ),
        None => (
            response.pointer("/header/musicDetailHeaderRenderer"),
            response.pointer(&format!("{SINGLE_COLUMN_SECTIONS}/0/musicPlaylistShelfRenderer")),
        ),
    };
    let shelf = shelf.ok_or_else(|| CatalogError::NotFound {
        entity: format!("playlist {id}"),
    })?;

    let mut playlist = Playlist {
        id: id.clone(),
        ..Playlist::default()
    };
    if let Some(header) = header {
        playlist.title = nav_str(header, TITLE_TEXT).unwrap_or_default();
        playlist.description = joined_runs(
            header.pointer("/description/musicDescriptionShelfRenderer/description"),
        )
        .or_else(|| joined_runs(header.get("description")));
        playlist.thumbnails = parse_thumbnails(header, MUSIC_THUMBNAILS);
        if playlist.thumbnails.is_empty() {
            playlist.thumbnails = parse_thumbnails(
                header,
                "/thumbnail/croppedSquareThumbnailRenderer/thumbnail/thumbnails",
            );
        }
        playlist.author = header
            .pointer("/straplineTextOne/runs/0")
            .or_else(|| header.pointer("/subtitle/runs/2"))
            .and_then(|run| {
                let name = run.get("text")?.as_str()?;
                Some(EntityRef::new(name, nav_str(run, "/navigationEndpoint/browseEndpoint/browseId")))
            });
        playlist.year = run_texts(nav_array(header, "/subtitle/runs"))
            .find(|text| is_year(text))
            .map(str::to_owned);
        let second: Vec<&str> = run_texts(nav_array(header, "/secondSubtitle/runs"))
            .filter(|text| text.trim() != "•")
            .collect();
        playlist.track_count = second
            .iter()
            .find(|text| text.contains("song") || text.contains("track"))
            .and_then(|text| leading_count(text));
        if second.len() > 1 {
            playlist.duration = second.last().map(|text| text.to_string());
        }
    }

    playlist.tracks = map_items(nav_array(shelf, "/contents"), None);
    let mut continuation = shelf_continuation(shelf);
    while playlist.tracks.len() < limit {
        let Some(token) = continuation.take() else {
            break;
        };
        let page = client.continuation("browse", &token, &body).await?;
        let before = playlist.tracks.len();
        playlist.tracks.extend(map_items(&page.contents, None));
        if playlist.tracks.len() == before {
            break;
        }
        continuation = page.next;
    }
    playlist.tracks.truncate(limit);
    tracing::debug!(playlist = %id, tracks = playlist.tracks.len(), "playlist fetched");
    Ok(playlist)
}

pub async fn lyrics(client: &InnertubeClient, browse_id: &str) -> CatalogResult<Lyrics> {
    if browse_id.trim().is_empty() {
        return Err(CatalogError::InvalidArgument {
            message: LYRICS_MISSING.into(),
        });
    }
    let response = browse(client, &json!({ "browseId": browse_id.trim() })).await?;
    let shelf = response.pointer(&format!(
        "{SINGLE_COLUMN_SECTIONS}/0/musicDescriptionShelfRenderer"
    ));
    Ok(Lyrics {
        lyrics: shelf.and_then(|shelf| joined_runs(shelf.get("description"))),
        source: shelf.and_then(|shelf| joined_runs(shelf.get("footer"))),
    })
}

fn home_section(section: &Value) -> Option<HomeSection> {
    let carousel = carousel_of(section)?;
    Some(HomeSection {
        title: carousel_title(carousel)?,
        contents: map_items(nav_array(carousel, "/contents"), None),
    })
}

pub async fn home(client: &InnertubeClient, limit: usize) -> CatalogResult<Vec<HomeSection>> {
    let body = json!({ "browseId": "FEmusic_home" });
    let response = browse(client, &body).await?;

    let mut sections: Vec<HomeSection> = nav_array(&response, SINGLE_COLUMN_SECTIONS)
        .iter()
        .filter_map(home_section)
        .collect();
    let mut continuation = nav_str(&response, SINGLE_COLUMN_CONTINUATION);
    while sections.len() < limit {
        let Some(token) = continuation.take() else {
            break;
        };
        let page = client.continuation("browse", &token, &body).await?;
        let before = sections.len();
        sections.extend(page.contents.iter().filter_map(home_section));
        if sections.len() == before {
            break;
        }
        continuation = page.next;
    }
    sections.truncate(limit);
    Ok(sections)
}
