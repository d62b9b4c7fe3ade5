//! Trending lookup with ordered fallback strategies.
//!
//! Strategies are tried in [`TRENDING_STRATEGIES`] order and the first one
//! that yields items wins. Chart failures never reach the caller; only a
//! failure of the final keyword search does.

use crate::catalog::{CatalogResult, MusicCatalog, SearchFilter};
use crate::config::TrendingConfig;
use crate::models::{CatalogItem, Charts};
use serde::{Deserialize, Serialize};

/// Which strategy produced a trending list. Serialized into the `source` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendingSource {
    /// The region chart's video ranking.
    Charts,
    /// The region chart's trending shelf.
    ChartsTrending,
    /// Keyword search for songs.
    SearchFallback,
}

pub const TRENDING_STRATEGIES: [TrendingSource; 3] = [
    TrendingSource::Charts,
    TrendingSource::ChartsTrending,
    TrendingSource::SearchFallback,
];

impl TrendingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingSource::Charts => "charts",
            TrendingSource::ChartsTrending => "charts_trending",
            TrendingSource::SearchFallback => "search_fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trending {
    pub trending: Vec<CatalogItem>,
    pub source: TrendingSource,
}

/// Fetches the region chart at most once and remembers failures as `None`.
struct ChartProbe<'a> {
    catalog: &'a dyn MusicCatalog,
    country: &'a str,
    fetched: Option<Option<Charts>>,
}

impl<'a> ChartProbe<'a> {
    fn new(catalog: &'a dyn MusicCatalog, country: &'a str) -> Self {
        Self {
            catalog,
            country,
            fetched: None,
        }
    }

    async fn charts(&mut self) -> Option<&Charts> {
        if self.fetched.is_none() {
            let charts = match self.catalog.get_charts(self.country).await {
                Ok(charts) => Some(charts),
                Err(err) => {
                    tracing::warn!(country = self.country, "chart lookup failed: {err}");
                    None
                }
            };
            self.fetched = Some(charts);
        }
        self.fetched.as_ref().and_then(Option::as_ref)
    }
}

async fn attempt(
    source: TrendingSource,
    probe: &mut ChartProbe<'_>,
    config: &TrendingConfig,
    limit: usize,
) -> CatalogResult<Option<Vec<CatalogItem>>> {
    let items = match source {
        TrendingSource::Charts => probe
            .charts()
            .await
            .and_then(|charts| charts.videos.as_ref())
            .filter(|section| section.has_items())
            .map(|section| section.items.clone()),
        TrendingSource::ChartsTrending => probe
            .charts()
            .await
            .and_then(|charts| charts.trending.as_ref())
            .filter(|section| section.has_items())
            .map(|section| section.items.clone()),
        TrendingSource::SearchFallback => Some(
            probe
                .catalog
                .search(&config.fallback_query, SearchFilter::Songs, limit)
                .await?,
        ),
    };
    Ok(items)
}

/// Resolves up to `limit` trending items, tagging the strategy that produced them.
pub async fn resolve_trending(
    catalog: &dyn MusicCatalog,
    config: &TrendingConfig,
    limit: usize,
) -> CatalogResult<Trending> {
    let mut probe = ChartProbe::new(catalog, &config.country);
    for source in TRENDING_STRATEGIES {
        if let Some(mut items) = attempt(source, &mut probe, config, limit).await? {
            items.truncate(limit);
            tracing::info!(source = source.as_str(), count = items.len(), "trending resolved");
            return Ok(Trending {
                trending: items,
                source,
            });
        }
        tracing::debug!(source = source.as_str(), "trending strategy yielded nothing");
    }

    Ok(Trending {
        trending: Vec::new(),
        source: TrendingSource::SearchFallback,
    })
}
