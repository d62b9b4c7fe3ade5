use crate::navigation::{nav_array, nav_str, ITEM_CONTINUATION, NEXT_CONTINUATION, RADIO_CONTINUATION};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use supersonic_core::catalog::{CatalogError, CatalogResult};
use supersonic_core::config::CatalogConfig;
use url::Url;

const CLIENT_NAME: &str = "WEB_REMIX";

/// One page of items fetched through a continuation token.
#[derive(Debug, Default)]
pub struct ContinuationPage {
    pub contents: Vec<Value>,
    pub next: Option<String>,
}

/// Thin innertube transport: builds the request context and maps HTTP
/// failures to [`CatalogError`].
#[derive(Debug, Clone)]
pub struct InnertubeClient {
    http: Client,
    base_url: Url,
    language: String,
    location: String,
    client_version: String,
}

impl InnertubeClient {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| CatalogError::Other {
            message: format!("invalid base_url: {e}"),
        })?;

        let origin = base_url.origin().ascii_serialization();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.language)?);
        headers.insert(ORIGIN, header_value(&origin)?);
        headers.insert(REFERER, header_value(base_url.as_str())?);
        headers.insert("x-origin", header_value(&origin)?);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Other {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url,
            language: config.language.clone(),
            location: config.location.clone(),
            client_version: chrono::Utc::now().format("1.%Y%m%d.01.00").to_string(),
        })
    }

    fn context(&self) -> Value {
        json!({
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": self.client_version,
                "hl": self.language,
                "gl": self.location,
            },
            "user": {}
        })
    }

    /// POSTs `body` (plus the client context) to `youtubei/v1/{endpoint}`.
    pub async fn post(&self, endpoint: &str, body: Value) -> CatalogResult<Value> {
        self.post_with_query(endpoint, body, &[]).await
    }

    async fn post_with_query(
        &self,
        endpoint: &str,
        body: Value,
        query: &[(&str, &str)],
    ) -> CatalogResult<Value> {
        let url = self
            .base_url
            .join(&format!("youtubei/v1/{endpoint}"))
            .map_err(|e| CatalogError::Other {
                message: e.to_string(),
            })?;

        let mut payload = match body {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        payload.insert("context".into(), self.context());

        tracing::debug!(endpoint, "innertube request");
        let resp = self
            .http
            .post(url)
            .query(&[("alt", "json"), ("prettyPrint", "false")])
            .query(query)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "innertube request failed");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        resp.json::<Value>().await.map_err(|e| CatalogError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetches the next page behind `token`, repeating the original request body.
    pub async fn continuation(
        &self,
        endpoint: &str,
        token: &str,
        body: &Value,
    ) -> CatalogResult<ContinuationPage> {
        let mut body = body.clone();
        if let Value::Object(map) = &mut body {
            map.insert("continuation".into(), Value::from(token));
        }
        let response = self
            .post_with_query(
                endpoint,
                body,
                &[("ctoken", token), ("continuation", token), ("type", "next")],
            )
            .await?;
        Ok(parse_continuation(&response))
    }
}

fn header_value(value: &str) -> CatalogResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| CatalogError::Other {
        message: format!("invalid header value {value:?}: {e}"),
    })
}

/// Reads both continuation layouts: `onResponseReceivedActions` appends and
/// the older `continuationContents.<shelf>` pages.
pub fn parse_continuation(response: &Value) -> ContinuationPage {
    let appended = nav_array(
        response,
        "/onResponseReceivedActions/0/appendContinuationItemsAction/continuationItems",
    );
    if !appended.is_empty() {
        return ContinuationPage {
            contents: appended.to_vec(),
            next: appended.last().and_then(|last| nav_str(last, ITEM_CONTINUATION)),
        };
    }

    let Some(shelf) = response
        .get("continuationContents")
        .and_then(Value::as_object)
        .and_then(|contents| contents.values().next())
    else {
        return ContinuationPage::default();
    };
    let contents = nav_array(shelf, "/contents").to_vec();
    let next = nav_str(shelf, NEXT_CONTINUATION)
        .or_else(|| nav_str(shelf, RADIO_CONTINUATION))
        .or_else(|| contents.last().and_then(|last| nav_str(last, ITEM_CONTINUATION)));
    ContinuationPage { contents, next }
}

/// Continuation token for a shelf: either its `continuations` block or a
/// trailing `continuationItemRenderer`.
pub fn shelf_continuation(shelf: &Value) -> Option<String> {
    nav_str(shelf, NEXT_CONTINUATION)
        .or_else(|| nav_str(shelf, RADIO_CONTINUATION))
        .or_else(|| {
            nav_array(shelf, "/contents")
                .last()
                .and_then(|last| nav_str(last, ITEM_CONTINUATION))
        })
}
