use crate::catalog::{CatalogError, MusicCatalog, SearchFilter};
use crate::format::{select_audio_format, Quality, SelectionError};
use thiserror::Error;

/// Expectations supplied by a catalog implementation to run the shared contract suite.
#[derive(Debug, Clone)]
pub struct CatalogContractExpectations {
    /// Search that must return results.
    pub search: SearchExpectation,
    /// Video whose player record must resolve.
    pub song_video_id: String,
    /// Region whose chart must resolve.
    pub chart_country: String,
    /// Whether the chart must contain a non-empty video or trending section.
    pub chart_has_items: bool,
}

#[derive(Debug, Clone)]
pub struct SearchExpectation {
    pub query: String,
    pub filter: SearchFilter,
    pub limit: usize,
    /// The first video id expected for the query (deterministic ordering).
    pub expected_first_video_id: String,
}

/// Errors surfaced by the catalog contract test harness.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogContractError {
    #[error("search returned no items for query: {query}")]
    EmptySearch { query: String },
    #[error("search returned {count} items, more than the limit of {limit}")]
    SearchOverLimit { count: usize, limit: usize },
    #[error("search returned wrong first video id: expected {expected:?}, got {actual:?}")]
    SearchWrongFirstItem {
        expected: String,
        actual: Option<String>,
    },
    #[error("search for {filter} returned an item typed {actual}")]
    SearchWrongResultType { filter: String, actual: String },
    #[error("get_song returned an empty record for {video_id}")]
    EmptySong { video_id: String },
    #[error("get_song returned mismatched id: expected {expected}, got {actual:?}")]
    SongMismatch {
        expected: String,
        actual: Option<String>,
    },
    #[error("song {video_id} could not be inspected for audio: {reason}")]
    SongSelection { video_id: String, reason: String },
    #[error("chart for {country} had no video or trending items")]
    EmptyChart { country: String },
    #[error("catalog returned lyrics for an empty browse id")]
    LyricsWithoutBrowseId,
    #[error("catalog error while running contract: {0}")]
    CatalogFailure(String),
}

/// Run the shared catalog contract suite against a catalog implementation.
///
/// Catalogs call this from their crate-level tests against fixtures that
/// exist in their test setup.
pub async fn run_catalog_contract<C: MusicCatalog + ?Sized>(
    catalog: &C,
    expectations: &CatalogContractExpectations,
) -> Result<(), CatalogContractError> {
    verify_search(catalog, &expectations.search).await?;
    verify_song(catalog, &expectations.song_video_id).await?;
    verify_charts(catalog, expectations).await?;
    verify_lyrics_need_browse_id(catalog).await?;
    Ok(())
}

async fn verify_search<C: MusicCatalog + ?Sized>(
    catalog: &C,
    expectation: &SearchExpectation,
) -> Result<(), CatalogContractError> {
    let items = catalog
        .search(&expectation.query, expectation.filter, expectation.limit)
        .await
        .map_err(|e| CatalogContractError::CatalogFailure(e.to_string()))?;

    let first = items.first().ok_or_else(|| CatalogContractError::EmptySearch {
        query: expectation.query.clone(),
    })?;

    if items.len() > expectation.limit {
        return Err(CatalogContractError::SearchOverLimit {
            count: items.len(),
            limit: expectation.limit,
        });
    }

    if first.video_id.as_deref() != Some(expectation.expected_first_video_id.as_str()) {
        return Err(CatalogContractError::SearchWrongFirstItem {
            expected: expectation.expected_first_video_id.clone(),
            actual: first.video_id.clone(),
        });
    }

    let expected_type = expectation.filter.result_type();
    if let Some(wrong) = items
        .iter()
        .filter_map(|item| item.result_type)
        .find(|result_type| *result_type != expected_type)
    {
        return Err(CatalogContractError::SearchWrongResultType {
            filter: expectation.filter.to_string(),
            actual: format!("{wrong:?}"),
        });
    }

    Ok(())
}

async fn verify_song<C: MusicCatalog + ?Sized>(
    catalog: &C,
    video_id: &str,
) -> Result<(), CatalogContractError> {
    let song = catalog
        .get_song(video_id)
        .await
        .map_err(|e| CatalogContractError::CatalogFailure(e.to_string()))?;

    if song.is_empty() {
        return Err(CatalogContractError::EmptySong {
            video_id: video_id.to_string(),
        });
    }

    if song.video_id() != Some(video_id) {
        return Err(CatalogContractError::SongMismatch {
            expected: video_id.to_string(),
            actual: song.video_id().map(str::to_owned),
        });
    }

    // A fetched, non-empty record may still be ciphered; only NotFound is a violation.
    match select_audio_format(&song, Quality::High) {
        Ok(_) | Err(SelectionError::SignatureRequired) | Err(SelectionError::NoAudioAvailable) => {
            Ok(())
        }
        Err(err) => Err(CatalogContractError::SongSelection {
            video_id: video_id.to_string(),
            reason: err.to_string(),
        }),
    }
}

async fn verify_charts<C: MusicCatalog + ?Sized>(
    catalog: &C,
    expectations: &CatalogContractExpectations,
) -> Result<(), CatalogContractError> {
    let charts = catalog
        .get_charts(&expectations.chart_country)
        .await
        .map_err(|e| CatalogContractError::CatalogFailure(e.to_string()))?;

    if !expectations.chart_has_items {
        return Ok(());
    }

    let has_items = [charts.videos.as_ref(), charts.trending.as_ref()]
        .into_iter()
        .flatten()
        .any(|section| section.has_items());
    if !has_items {
        return Err(CatalogContractError::EmptyChart {
            country: expectations.chart_country.clone(),
        });
    }
    Ok(())
}

/// Ids are otherwise passed upstream untouched, but a lyrics lookup with no
/// browse id can never succeed and must fail before any request.
async fn verify_lyrics_need_browse_id<C: MusicCatalog + ?Sized>(
    catalog: &C,
) -> Result<(), CatalogContractError> {
    match catalog.get_lyrics("").await {
        Err(CatalogError::InvalidArgument { .. }) | Err(CatalogError::NotSupported { .. }) => {
            Ok(())
        }
        Err(err) => Err(CatalogContractError::CatalogFailure(err.to_string())),
        Ok(_) => Err(CatalogContractError::LyricsWithoutBrowseId),
    }
}
