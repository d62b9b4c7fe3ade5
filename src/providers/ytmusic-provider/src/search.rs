use crate::client::InnertubeClient;
use crate::mapping::map_items;
use crate::navigation::{nav_array, nav_str, NEXT_CONTINUATION, SEARCH_SECTIONS};
use serde_json::json;
use supersonic_core::catalog::{CatalogResult, SearchFilter};
use supersonic_core::models::CatalogItem;

const FILTERED_PREFIX: &str = "EgWKAQ";
const FILTERED_SUFFIX: &str = "AWoMEA4QChADEAQQCRAF";

/// Opaque `params` token selecting a filtered search.
pub fn search_params(filter: SearchFilter) -> String {
    let category = match filter {
        SearchFilter::Songs => "II",
        SearchFilter::Videos => "IQ",
        SearchFilter::Albums => "IY",
        SearchFilter::Artists => "Ig",
        SearchFilter::Playlists => "Io",
        SearchFilter::FeaturedPlaylists => return "EgeKAQQoADgBagwQDhAKEAMQBBAJEAU%3D".into(),
        SearchFilter::CommunityPlaylists => return "EgeKAQQoAEABagwQDhAKEAMQBBAJEAU%3D".into(),
    };
    format!("{FILTERED_PREFIX}{category}{FILTERED_SUFFIX}")
}

pub async fn search(
    client: &InnertubeClient,
    query: &str,
    filter: SearchFilter,
    limit: usize,
) -> CatalogResult<Vec<CatalogItem>> {
    let body = json!({ "query": query, "params": search_params(filter) });
    let response = client.post("search", body.clone()).await?;

    let result_type = Some(filter.result_type());
    let mut items = Vec::new();
    let mut continuation = None;
    for section in nav_array(&response, SEARCH_SECTIONS) {
        let Some(shelf) = section.get("musicShelfRenderer") else {
            continue;
        };
        items.extend(map_items(nav_array(shelf, "/contents"), result_type));
        continuation = continuation.or_else(|| nav_str(shelf, NEXT_CONTINUATION));
    }

    while items.len() < limit {
        let Some(token) = continuation.take() else {
            break;
        };
        let page = client.continuation("search", &token, &body).await?;
        let before = items.len();
        items.extend(map_items(&page.contents, result_type));
        if items.len() == before {
            break;
        }
        continuation = page.next;
    }

    items.truncate(limit);
    tracing::debug!(query, filter = filter.as_str(), count = items.len(), "search complete");
    Ok(items)
}
