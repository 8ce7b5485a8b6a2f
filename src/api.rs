use crate::card::{CardRecord, RawCard};
use crate::config::{ClientConfig, ResponseEnvelope};
use crate::error::FetchError;
use crate::filter::{self, RangeSpec, SortDirection, SortKey};
use crate::normalize::normalize_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

/// What the card list should show: an HP bucket, an optional HP range and
/// an ordering.
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    pub filter_key: String,
    pub range: Option<RangeSpec>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl CardQuery {
    pub fn new(filter_key: impl Into<String>) -> Self {
        CardQuery {
            filter_key: filter_key.into(),
            ..CardQuery::default()
        }
    }

    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    pub fn sorted_by(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }
}

/// Client for the card service's catalog and search endpoints.
#[derive(Debug, Clone)]
pub struct CardApi {
    client: Client,
    config: ClientConfig,
}

impl CardApi {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::transport("Failed to build HTTP client", e))?;
        Ok(CardApi { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// HP buckets the service can be searched by.
    pub async fn fetch_catalog(&self) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint("catalog/hps", &[])?;
        let items = self
            .fetch_data(url, "Failed to fetch catalog data")
            .await
            .map_err(|e| {
                error!(kind = %e.kind(), "Error in fetch_catalog: {}", e);
                e
            })?;

        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(FetchError::malformed(format!(
                    "Unexpected catalog entry: {}",
                    other
                ))),
            })
            .collect()
    }

    /// Cards in the HP bucket `filter_key`, normalized, in service order.
    ///
    /// A blank key matches nothing and returns without a request. Any other
    /// key is sent as given.
    pub async fn search_cards(&self, filter_key: &str) -> Result<Vec<CardRecord>, FetchError> {
        if filter_key.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(
            "cards/search",
            &[(self.config.search_param.as_str(), filter_key), ("pretty", "true")],
        )?;
        let items = self
            .fetch_data(url, "Failed to fetch card data")
            .await
            .map_err(|e| {
                error!(kind = %e.kind(), filter_key, "Error in search_cards: {}", e);
                e
            })?;

        let raws = items.into_iter().map(RawCard::from_value).collect();
        let cards = normalize_all(raws);
        debug!(filter_key, count = cards.len(), "Fetched cards");
        Ok(cards)
    }

    /// Search, then range filter, then sort.
    pub async fn browse(&self, query: &CardQuery) -> Result<Vec<CardRecord>, FetchError> {
        let mut cards = self.search_cards(&query.filter_key).await?;
        if let Some(range) = query.range {
            cards = filter::filter_hp(cards, range);
        }
        Ok(filter::sort_by(cards, query.sort, query.direction))
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut base = self.config.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let mut url = base
            .join(path)
            .map_err(|e| FetchError::transport(format!("Invalid upstream URL for {}", path), e))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request_url(&self, target: &Url) -> String {
        match self.config.envelope {
            ResponseEnvelope::Direct => target.to_string(),
            ResponseEnvelope::Wrapped => format!(
                "{}{}",
                self.config.cors_proxy,
                urlencoding::encode(target.as_str())
            ),
        }
    }

    /// GETs `target` and returns the `data` array of the body.
    async fn fetch_data(&self, target: Url, context: &str) -> Result<Vec<Value>, FetchError> {
        let request_url = self.request_url(&target);
        debug!(url = %request_url, "Requesting upstream");

        let response = self
            .client
            .get(&request_url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::transport(context, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(context, e))?;

        let payload = match self.config.envelope {
            ResponseEnvelope::Direct => parse_json(&body)?,
            ResponseEnvelope::Wrapped => unwrap_contents(parse_json(&body)?)?,
        };
        extract_data(payload)
    }
}

fn parse_json(body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body)
        .map_err(|e| FetchError::malformed_with("Upstream response is not valid JSON", e))
}

/// Unwraps a CORS proxy `{ "contents": "<json text>" }` body.
fn unwrap_contents(envelope: Value) -> Result<Value, FetchError> {
    match envelope.get("contents") {
        Some(Value::String(contents)) => parse_json(contents),
        _ => Err(FetchError::malformed(
            "Proxy response has no string `contents` field",
        )),
    }
}

/// `{ "data": [...] }`, or a bare array as served by the local proxy.
fn extract_data(payload: Value) -> Result<Vec<Value>, FetchError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(FetchError::malformed("Unexpected response format")),
        },
        _ => Err(FetchError::malformed("Unexpected response format")),
    }
}
